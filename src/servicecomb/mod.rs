//! ServiceComb configuration-center integration.
//!
//! [`ServicecombConfiguration`] adapts a [`ConfigCenterClient`](crate::client::ConfigCenterClient)
//! to the [`Configuration`](crate::core::Configuration) contract.
//! [`auth`] turns bootstrap keys into TLS options and request authentication,
//! and [`ConfigCenterSettings`] gathers everything a client needs to connect.

pub mod auth;
mod configuration;
pub mod keys;
mod settings;
mod ssl_custom;

pub use configuration::{AdapterOptions, ServicecombConfiguration};
pub use settings::{ConfigCenterSettings, HttpConfiguration};
pub use ssl_custom::{
    DefaultSslCustom, SslCustom, SslCustomFactory, create_ssl_custom, register_ssl_custom,
};
