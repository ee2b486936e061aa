//! # Broker Profiles
//!
//! Turns a declarative [`ConfigModel`](mqf_domain::ConfigModel) into a named
//! profile inside a version scope of the registry.
//!
//! * [`ProfileManager::create_or_update`] is idempotent by profile name and
//!   version scope: the first run creates the profile, later runs merge the
//!   fields that are set (last writer wins per key).
//! * Broker settings live under the `mq.fabric.server-{broker}` PID; JVM options
//!   and the minimum instance count are profile attributes.
//! * [`ProfileStore`] is the persistence seam; [`RegistryProfileStore`] keeps
//!   JSON [`ProfileRecord`]s in any [`Registry`](mqf_registry::Registry).

mod error;
mod manager;
pub mod record;
mod store;

pub use error::{ProfileError, ProfileErrorExt};
pub use manager::ProfileManager;
pub use record::ProfileRecord;
pub use store::{ProfileStore, RegistryProfileStore};
