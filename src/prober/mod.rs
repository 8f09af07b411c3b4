pub mod error;
pub mod probe;
pub mod region;
pub mod result;

pub mod prelude {
    pub use super::error::ProbeError;
    pub use super::probe::Prober;
    pub use super::result::ProbeResult;
}
