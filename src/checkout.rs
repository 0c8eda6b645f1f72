//! # Checkout Module
//!
//! The checkout conversation is a linear state machine:
//!
//! ```text
//! AwaitingPhone -> AwaitingAddress -> AwaitingConfirmation -> Completed | Cancelled
//! ```
//!
//! Only the three waiting states are stored. Terminal outcomes are reported
//! as [`Transition`]s and the caller discards the session when it sees one.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use teloxide::types::UserId;

use crate::cart::CartView;
use crate::catalog::Price;
use crate::errors::ValidationError;

/// Minimum number of characters in a trimmed shipping address
pub const MIN_ADDRESS_LENGTH: usize = 5;

lazy_static! {
    static ref PHONE_REGEX: Regex =
        Regex::new(r"^\+?[0-9]{10,15}$").expect("Phone number pattern should be valid");
}

/// Validates a phone number: optional leading plus followed by 10 to 15 digits
pub fn validate_phone(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if PHONE_REGEX.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::Phone)
    }
}

/// Validates a shipping address
pub fn validate_address(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.chars().count() < MIN_ADDRESS_LENGTH {
        return Err(ValidationError::Address);
    }
    Ok(trimmed.to_string())
}

/// Where a user currently is in the checkout conversation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutState {
    AwaitingPhone {
        cart: CartView,
    },
    AwaitingAddress {
        cart: CartView,
        phone: String,
    },
    AwaitingConfirmation {
        cart: CartView,
        phone: String,
        address: String,
    },
}

/// Input delivered to an active checkout session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutInput {
    /// Free-text message
    Text(String),
    /// "Confirm order" button
    Confirm,
    /// "Cancel order" button
    Cancel,
    /// Explicit abort command (`/cancel`)
    Abort,
    /// Any other command or a non-text message
    Unexpected,
}

/// A confirmed order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub cart: CartView,
    pub phone: String,
    pub address: String,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    pub fn total(&self) -> Price {
        self.cart.total()
    }
}

/// Result of feeding one input to a checkout state
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Input rejected; the session stays in `state`
    Reprompt {
        state: CheckoutState,
        error: ValidationError,
    },
    /// Input accepted; the session moves to the new state
    Advance(CheckoutState),
    /// Input does not apply to this state and is ignored
    Unchanged(CheckoutState),
    /// Order confirmed; the cart is cleared and the session ends
    Completed(Order),
    /// Order cancelled; the session ends, the cart is kept
    Cancelled,
    /// Invalid input while awaiting confirmation; the session ends
    Failed,
    /// Aborted by command or unexpected message; the session ends
    Aborted,
}

impl Transition {
    /// Whether this transition ends the session
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Transition::Completed(_)
                | Transition::Cancelled
                | Transition::Failed
                | Transition::Aborted
        )
    }
}

impl CheckoutState {
    /// Entry state for a checkout over the given cart snapshot
    pub fn begin(cart: CartView) -> Self {
        CheckoutState::AwaitingPhone { cart }
    }

    pub fn cart(&self) -> &CartView {
        match self {
            CheckoutState::AwaitingPhone { cart }
            | CheckoutState::AwaitingAddress { cart, .. }
            | CheckoutState::AwaitingConfirmation { cart, .. } => cart,
        }
    }

    /// Apply one input
    pub fn step(self, input: CheckoutInput) -> Transition {
        use CheckoutInput as In;
        use CheckoutState as S;

        match (self, input) {
            // Fallbacks win over every state-specific rule
            (_, In::Abort | In::Unexpected) => Transition::Aborted,

            (S::AwaitingPhone { cart }, In::Text(text)) => match validate_phone(&text) {
                Ok(phone) => Transition::Advance(S::AwaitingAddress { cart, phone }),
                Err(error) => Transition::Reprompt {
                    state: S::AwaitingPhone { cart },
                    error,
                },
            },

            (S::AwaitingAddress { cart, phone }, In::Text(text)) => {
                match validate_address(&text) {
                    Ok(address) => Transition::Advance(S::AwaitingConfirmation {
                        cart,
                        phone,
                        address,
                    }),
                    Err(error) => Transition::Reprompt {
                        state: S::AwaitingAddress { cart, phone },
                        error,
                    },
                }
            }

            (
                S::AwaitingConfirmation {
                    cart,
                    phone,
                    address,
                },
                In::Confirm,
            ) => Transition::Completed(Order {
                cart,
                phone,
                address,
                placed_at: Utc::now(),
            }),
            (S::AwaitingConfirmation { .. }, In::Cancel) => Transition::Cancelled,
            (S::AwaitingConfirmation { .. }, In::Text(_)) => Transition::Failed,

            // Confirmation buttons from a stale summary before the summary exists
            (state, In::Confirm | In::Cancel) => Transition::Unchanged(state),
        }
    }
}

/// Active checkout sessions keyed by user, at most one per user
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, CheckoutState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<UserId, CheckoutState>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a checkout, replacing any session the user already had.
    /// Returns true when an existing session was overridden.
    pub fn begin(&self, user: UserId, cart: CartView) -> bool {
        self.sessions()
            .insert(user, CheckoutState::begin(cart))
            .is_some()
    }

    pub fn get(&self, user: UserId) -> Option<CheckoutState> {
        self.sessions().get(&user).cloned()
    }

    pub fn replace(&self, user: UserId, state: CheckoutState) {
        self.sessions().insert(user, state);
    }

    /// Discard the user's session
    pub fn end(&self, user: UserId) -> Option<CheckoutState> {
        self.sessions().remove(&user)
    }

    pub fn is_active(&self, user: UserId) -> bool {
        self.sessions().contains_key(&user)
    }

    pub fn active_count(&self) -> usize {
        self.sessions().len()
    }

    pub fn clear_all(&self) {
        self.sessions().clear();
    }
}
