//! # Localization Tests
//!
//! Message lookup and argument substitution for the embedded Fluent
//! resource.

use storefront::localization::{t, t_args, LocalizationManager};

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() -> LocalizationManager {
        LocalizationManager::new().expect("Failed to create localization manager")
    }

    #[test]
    fn test_get_message_existing_key() {
        let manager = setup_localization();

        let message = manager.get_message("cart-empty", &[]);
        assert_eq!(message, "Your cart is empty!");
    }

    #[test]
    fn test_get_message_nonexistent_key() {
        let manager = setup_localization();

        let message = manager.get_message("nonexistent-key", &[]);
        assert!(message.starts_with("Missing translation:"));
    }

    #[test]
    fn test_get_message_with_args() {
        let manager = setup_localization();

        let message = manager.get_message(
            "cart-line",
            &[("name", "Dummy Product A"), ("quantity", "2"), ("amount", "$20.00")],
        );
        // No bidi isolation marks around placeables
        assert_eq!(message, "- Dummy Product A (x2) - $20.00");
    }

    #[test]
    fn test_global_helpers() {
        assert_eq!(t("button-main-menu"), "Back to Main Menu");
        assert_eq!(
            t_args("cart-item-removed", &[("name", "Dummy Product C")]),
            "Dummy Product C removed from your cart."
        );
    }

    #[test]
    fn test_invalid_source_is_rejected() {
        assert!(LocalizationManager::from_source("broken = {").is_err());
    }
}
