pub mod auth;
pub mod export;
pub mod fetch;
pub mod map_sync;
pub mod payload;
pub mod pool;
pub mod stats;

pub use auth::{AuthStatus, Role, SignupRequest, TokenPair, User};
pub use fetch::{FetchSequence, FetchTicket};
pub use map_sync::{MapBounds, MapSync, MarkerState, MarkerSurface, SurfaceError};
pub use payload::extract_pools;
pub use pool::{HealthState, LatLong, Pool, PoolDraft, PoolId, ResolutionState};
pub use stats::{DistrictRating, HealthBreakdown, PoolStats};
