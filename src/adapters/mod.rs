//! External system integrations.
//!
//! - [`limsrest`] - LimsRest service integration
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the pipeline can
//! be tested with in-memory implementations. The LimsRest adapter has two
//! seams: [`limsrest::Transport`] (raw authenticated GET) and
//! [`limsrest::LimsSource`] (typed lookups used by the orchestrator).
//!
//! ```rust,no_run
//! use metadb_checker::adapters::limsrest::LimsRestClient;
//! use metadb_checker::config::{secret_string, LimsRestConfig, ManifestSelection};
//! use metadb_checker::domain::Cutoff;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LimsRestConfig {
//!     base_url: "https://igolims.example.org:8443".to_string(),
//!     username: "checker".to_string(),
//!     password: Some(secret_string("pass".to_string())),
//!     ..Default::default()
//! };
//!
//! let client = LimsRestClient::from_config(&config, ManifestSelection::First)?;
//! let deliveries = client.list_deliveries(Cutoff::parse_delivery_date("2021/02/25")?).await?;
//! # Ok(())
//! # }
//! ```

pub mod limsrest;
