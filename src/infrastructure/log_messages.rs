//! Log message constants
//!
//! This module centralizes the log messages used by the generator so that
//! wording stays consistent between the sink, the transports and the binary.

/// Application startup and lifecycle messages
pub mod application {
    pub const STARTING: &str = "Starting Event Maker";
    pub const SETTINGS_LOADED: &str = "Configuration loaded";
    pub const CHANNELS_READY: &str = "Output channels ready";
    pub const SHUTDOWN_REQUESTED: &str = "Shutdown requested";
    pub const LOOP_ALREADY_EXITED: &str = "Publish loop already exited before shutdown";
    pub const STOPPED: &str = "Event Maker stopped";
}

/// Event synthesis messages
pub mod synthesis {
    pub const EVENT_SYNTHESIZED: &str = "Event synthesized";
}

/// Publish loop messages
pub mod publishing {
    pub const LOOP_STARTED: &str = "Publish loop started";
    pub const LOOP_STOPPED: &str = "Publish loop stopped";
    pub const PUSH_FAILED: &str = "Error on push to channel";
}

/// Transport messages
pub mod transport {
    pub const TOPIC_FOUND: &str = "Using existing topic";
    pub const TOPIC_CREATED: &str = "Created topic";
    pub const MESSAGE_PUBLISHED: &str = "Message published";
}

/// Identity lookup messages
pub mod identity {
    pub const PROJECT_CONFIGURED: &str = "Using configured project";
    pub const PROJECT_RESOLVED: &str = "Resolved project from metadata server";
    pub const LOOKUP_FAILED: &str = "Error resolving project from metadata server";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_messages_are_not_empty() {
        assert!(application::STARTING.len() > 10);
        assert!(application::SHUTDOWN_REQUESTED.len() > 10);
        assert!(application::SETTINGS_LOADED.len() > 10);
        assert!(application::LOOP_ALREADY_EXITED.len() > 10);
        assert!(synthesis::EVENT_SYNTHESIZED.len() > 10);
        assert!(publishing::PUSH_FAILED.len() > 10);
        assert!(transport::TOPIC_CREATED.len() > 10);
        assert!(identity::LOOKUP_FAILED.len() > 10);
    }

    #[test]
    fn test_messages_have_no_placeholders() {
        // Values travel as structured fields, never interpolated.
        for message in [
            application::STARTING,
            publishing::PUSH_FAILED,
            transport::MESSAGE_PUBLISHED,
            identity::PROJECT_RESOLVED,
        ] {
            assert!(!message.contains("{}"));
        }
    }
}
