// Docker invocation layer — argv descriptors, capture/stream execution, cancellation.

pub mod exec;
pub mod run;
pub mod types;

pub use exec::{Docker, DockerCli};
pub use run::{capture, ensure_available, stream};
pub use types::{CancelToken, Captured, DockerCommand, StreamOutcome};
