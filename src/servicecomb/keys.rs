//! Recognized configuration keys and their literal defaults.

#![allow(missing_docs)]

/// Type name reported by the ServiceComb configuration.
pub const CONFIG_TYPE: &str = "servicecomb";

/// Configuration center address; several addresses are comma separated.
pub const KEY_CONFIG_ADDRESS: &str = "servicecomb.config.address";
/// Kie project the configuration lives in.
pub const KEY_SERVICE_PROJECT: &str = "servicecomb.service.project";
/// Application label used to select keys.
pub const KEY_SERVICE_APPLICATION: &str = "servicecomb.service.application";
/// Service label used to select keys.
pub const KEY_SERVICE_NAME: &str = "servicecomb.service.name";
/// Environment label used to select keys.
pub const KEY_SERVICE_ENVIRONMENT: &str = "servicecomb.service.environment";
/// Interval between two polls of the configuration center.
pub const KEY_CONFIG_REFRESH_INTERVAL: &str = "servicecomb.config.refreshInterval";
/// Whether a failed first pull aborts start-up.
pub const KEY_CONFIG_FIRST_PULL_REQUIRED: &str = "servicecomb.config.firstPullRequired";
/// Whether added and updated keys are written to the adapter snapshot.
pub const KEY_CONFIG_WRITE_THROUGH: &str = "servicecomb.config.writeThrough";

pub const KEY_SSL_ENABLED: &str = "servicecomb.ssl.enabled";
pub const KEY_SSL_ENGINE: &str = "servicecomb.ssl.engine";
pub const KEY_SSL_PROTOCOLS: &str = "servicecomb.ssl.protocols";
pub const KEY_SSL_CIPHERS: &str = "servicecomb.ssl.ciphers";
pub const KEY_SSL_AUTH_PEER: &str = "servicecomb.ssl.authPeer";
pub const KEY_SSL_CHECKCN_HOST: &str = "servicecomb.ssl.checkCNHost";
pub const KEY_SSL_CHECKCN_WHITE: &str = "servicecomb.ssl.checkCNWhite";
pub const KEY_SSL_CHECKCN_WHITE_FILE: &str = "servicecomb.ssl.checkCNWhiteFile";
pub const KEY_SSL_ALLOW_RENEGOTIATE: &str = "servicecomb.ssl.allowRenegotiate";
pub const KEY_SSL_STORE_PATH: &str = "servicecomb.ssl.storePath";
pub const KEY_SSL_KEYSTORE: &str = "servicecomb.ssl.keyStore";
pub const KEY_SSL_KEYSTORE_TYPE: &str = "servicecomb.ssl.keyStoreType";
pub const KEY_SSL_KEYSTORE_VALUE: &str = "servicecomb.ssl.keyStoreValue";
pub const KEY_SSL_TRUST_STORE: &str = "servicecomb.ssl.trustStore";
pub const KEY_SSL_TRUST_STORE_TYPE: &str = "servicecomb.ssl.trustStoreType";
pub const KEY_SSL_TRUST_STORE_VALUE: &str = "servicecomb.ssl.trustStoreValue";
pub const KEY_SSL_CRL: &str = "servicecomb.ssl.crl";
pub const KEY_SSL_SSL_CUSTOM_CLASS: &str = "servicecomb.ssl.sslCustomClass";

pub const EMPTY: &str = "";
pub const TRUE: &str = "true";
pub const FALSE: &str = "false";
pub const JDK: &str = "jdk";
pub const TLS: &str = "TLSv1.2";
pub const PKCS12: &str = "PKCS12";
pub const INTERNAL: &str = "internal";
pub const DEFAULT_CIPHERS: &str = "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,TLS_RSA_WITH_AES_256_GCM_SHA384,TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,TLS_RSA_WITH_AES_128_GCM_SHA256";

pub const DEFAULT_CONFIG_ADDRESS: &str = "http://127.0.0.1:30110";
pub const DEFAULT_PROJECT: &str = "default";
pub const DEFAULT_APPLICATION: &str = "seata";
pub const DEFAULT_SERVICE_NAME: &str = "seata-server";
pub const DEFAULT_REFRESH_INTERVAL: &str = "15s";
