pub mod category_helpers;
pub mod form_helpers;
pub mod post_listing_helpers;
pub mod public_helpers;
pub mod search_helpers;
pub mod single_post_helpers;
pub mod verification_helpers;
