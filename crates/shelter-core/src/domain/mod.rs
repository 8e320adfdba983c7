//! Domain model (requests, responses, cache identity, lifecycle, errors).

pub mod entry;
pub mod errors;
pub mod ids;
pub mod manifest;
pub mod outcome;
pub mod request;
pub mod response;
pub mod state;
pub mod version;

pub use self::entry::CachedEntry;
pub use self::errors::{
    ActivateError, CacheError, InstallError, ManifestError, NetworkError, VersionError,
};
pub use self::ids::{AgentId, ClientId};
pub use self::manifest::AssetManifest;
pub use self::outcome::{FetchOutcome, ResponseSource};
pub use self::request::{Method, Request, RequestKey};
pub use self::response::Response;
pub use self::state::AgentState;
pub use self::version::CacheVersion;
