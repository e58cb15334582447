// Response resolution
// Stored fixture when there is a usable one, otherwise a built-in default

use super::{MockMethod, ResponseFixture};
use crate::logger;
use crate::storage::{ResponseStore, StorageKey};

/// Where the served fixture came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureSource {
    Stored,
    DefaultPreflight,
    DefaultMethodNotAllowed,
}

impl FixtureSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::DefaultPreflight => "default-preflight",
            Self::DefaultMethodNotAllowed => "default-405",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub fixture: ResponseFixture,
    pub source: FixtureSource,
}

impl Resolution {
    /// Built-in answer when no fixture is available
    pub fn default_for(method: MockMethod) -> Self {
        match method {
            MockMethod::Options => Self {
                fixture: ResponseFixture::preflight(),
                source: FixtureSource::DefaultPreflight,
            },
            _ => Self {
                fixture: ResponseFixture::method_not_allowed(),
                source: FixtureSource::DefaultMethodNotAllowed,
            },
        }
    }
}

/// Look up the fixture at `key`
///
/// Read failures and values that are not a fixture are logged and handled
/// exactly like a missing fixture.
pub fn resolve(store: &dyn ResponseStore, key: &StorageKey, method: MockMethod) -> Resolution {
    let stored = match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            logger::log_warning(&format!("Fixture read failed, using default: {e}"));
            None
        }
    };

    let fixture = stored.and_then(|value| match ResponseFixture::from_value(value) {
        Ok(fixture) => Some(fixture),
        Err(e) => {
            logger::log_warning(&format!("Ignoring malformed fixture {key}: {e}"));
            None
        }
    });

    match fixture {
        Some(fixture) => Resolution {
            fixture,
            source: FixtureSource::Stored,
        },
        None => Resolution::default_for(method),
    }
}
