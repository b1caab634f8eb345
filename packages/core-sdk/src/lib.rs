pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod normalize;
pub mod scorer;
pub mod server;
pub mod telemetry;
pub mod tools;

/**
 * \brief SDK prelude for the most common entry points.
 */
pub mod prelude {
    pub use crate::config::{Backend, ProviderConfig};
    pub use crate::error::{ConfigError, GatewayError};
    pub use crate::llm::{Completer, Gateway};
    pub use crate::models::{Message, Role};
    pub use crate::scorer::{self, Level, Platform, ScoreResult};
    pub use crate::server;
    pub use crate::telemetry;
    pub use crate::tools::{self, Tool, ToolContext};
}
