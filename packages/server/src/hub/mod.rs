//! The hub: single authority over the live connection set.
//!
//! All membership changes and every fan-out run on one control loop
//! (`Hub::run`). Other tasks only talk to it through a `HubHandle`.

mod control;
mod handle;

pub use control::Hub;
pub use handle::HubHandle;
