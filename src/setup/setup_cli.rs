use blog_reader_backend::config::Config;
use blog_reader_backend::models::db_operations::languages_db_operations;
use blog_reader_backend::setup::db_setup;
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "setup_cli", author, version, about = "A CLI for initial blog reader setup.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the .env configuration file.
    #[arg(long, required = true, value_name = "FILE")]
    env_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    Language {
        #[command(subcommand)]
        action: LanguageAction,
    },
}

#[derive(Subcommand, Debug)]
enum DbAction {
    Setup,
}

#[derive(Subcommand, Debug)]
enum LanguageAction {
    Add {
        #[arg(long)]
        locale: String,
        #[arg(long)]
        name: String,
    },
    List,
}

fn main() {
    let cli = Cli::parse();

    let config = Config::from_env(&cli.env_file)
        .expect("FATAL: Failed to load or parse configuration.");

    match &cli.command {
        Commands::Db { action } => match action {
            DbAction::Setup => setup_blog_database(&config),
        },
        Commands::Language { action } => match action {
            LanguageAction::Add { locale, name } => add_language(&config, locale, name),
            LanguageAction::List => list_languages(&config),
        },
    }
}

fn setup_blog_database(config: &Config) {
    let db_path = config.blog_db_path();
    println!("\nSetting up blog database at '{}'...", db_path.display());

    if let Some(parent_dir) = db_path.parent() {
        fs::create_dir_all(parent_dir).expect("Could not create database directory.");
    }

    let mut conn = Connection::open(&db_path).expect("Could not create blog database file.");
    match db_setup::setup_blog_db(&mut conn) {
        Ok(_) => println!("✅ Blog database setup completed successfully."),
        Err(e) => eprintln!("❌ Error setting up blog database: {}", e),
    }
}

fn open_existing(config: &Config) -> Option<Connection> {
    let db_path = config.blog_db_path();
    if !db_path.exists() {
        eprintln!(
            "❌ Error: Blog database not found at '{}'. Please run `setup_cli db setup` first.",
            db_path.display()
        );
        return None;
    }
    match Connection::open(&db_path) {
        Ok(conn) => Some(conn),
        Err(e) => {
            eprintln!("❌ Error opening blog database: {}", e);
            None
        }
    }
}

fn add_language(config: &Config, locale: &str, name: &str) {
    let Some(conn) = open_existing(config) else {
        return;
    };
    match languages_db_operations::create_language(&conn, locale.trim(), name.trim()) {
        Ok(id) => println!("✅ Language '{}' ({}) registered with id {}.", name, locale, id),
        Err(e) => eprintln!("❌ Error adding language: {}. The locale might already exist.", e),
    }
}

fn list_languages(config: &Config) {
    let Some(conn) = open_existing(config) else {
        return;
    };
    match languages_db_operations::read_active_languages(&conn) {
        Ok(languages) => {
            println!("Active languages:");
            for language in languages {
                println!("- [{}] {} ({})", language.id, language.name, language.locale);
            }
        }
        Err(e) => eprintln!("❌ Error fetching languages: {}", e),
    }
}
