//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the ONNX classifier
    pub model_path: String,

    /// Path to the normalization statistics (mean/std JSON)
    pub norm_stats_path: String,

    /// Path to the class label table (JSON)
    pub labels_path: String,

    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: "cnn_lstm_model.onnx".to_string(),
            norm_stats_path: "mean_std.json".to_string(),
            labels_path: "label_encoder.json".to_string(),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            model_path: env::var("MODEL_PATH")
                .unwrap_or(defaults.model_path),

            norm_stats_path: env::var("NORM_STATS_PATH")
                .unwrap_or(defaults.norm_stats_path),

            labels_path: env::var("LABELS_PATH")
                .unwrap_or(defaults.labels_path),

            host: env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.host),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),
        }
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
