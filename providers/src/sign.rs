//! SigV4-style request signing
//!
//! SDK-free implementation of the four-step AWS signature scheme, shared by
//! every caller that needs signed requests. The signer sees only the pieces
//! that enter the signature: method, host, path, query, payload bytes, and
//! the timestamp; bodies matter solely through their SHA-256 hash.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// The signing algorithm name placed in the Authorization header
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Header set covered by the signature, in canonical order
pub const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

/// A long-lived access key pair
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Access key id (goes into the credential scope)
    pub access_key: String,
    /// Secret key (seeds the signing key chain, never sent)
    pub secret_key: String,
}

/// Everything about one request that enters its signature
#[derive(Debug)]
pub struct SigningParams<'a> {
    /// HTTP method, uppercase
    pub method: &'a str,
    /// Host header value
    pub host: &'a str,
    /// Request path as it will be sent
    pub path: &'a str,
    /// Query parameters, decoded; the signer sorts and encodes them
    pub query: &'a [(&'a str, &'a str)],
    /// Region component of the credential scope
    pub region: &'a str,
    /// Service component of the credential scope
    pub service: &'a str,
    /// Exact bytes of the request body
    pub payload: &'a [u8],
    /// Request timestamp; also sent as `x-amz-date`
    pub timestamp: DateTime<Utc>,
}

/// The headers a signed request must carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// `host`
    pub host: String,
    /// `x-amz-date`, timestamp in basic ISO-8601
    pub amz_date: String,
    /// `x-amz-content-sha256`, hex hash of the payload
    pub content_sha256: String,
    /// `Authorization` with algorithm, scope, header list, and signature
    pub authorization: String,
}

/// Sign one request
pub fn sign(params: &SigningParams<'_>, credentials: &Credentials) -> SignedHeaders {
    let amz_date = params.timestamp.format("%Y%m%dT%H%M%SZ").to_string();
    let date = params.timestamp.format("%Y%m%d").to_string();
    let payload_hash = hex_sha256(params.payload);

    // Step 1: canonical request
    let canonical_headers = format!(
        "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
        params.host, payload_hash, amz_date
    );
    let canonical_request = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        params.method,
        canonical_path(params.path),
        canonical_query(params.query),
        canonical_headers,
        SIGNED_HEADERS,
        payload_hash
    );

    // Step 2: credential scope
    let scope = format!(
        "{}/{}/{}/aws4_request",
        date, params.region, params.service
    );

    // Step 3: string to sign
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        hex_sha256(canonical_request.as_bytes())
    );

    // Step 4: chained key derivation, then the final MAC
    let secret = format!("AWS4{}", credentials.secret_key);
    let k_date = hmac(secret.as_bytes(), date.as_bytes());
    let k_region = hmac(&k_date, params.region.as_bytes());
    let k_service = hmac(&k_region, params.service.as_bytes());
    let k_signing = hmac(&k_service, b"aws4_request");
    let signature = hex::encode(hmac(&k_signing, string_to_sign.as_bytes()));

    let authorization = format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, credentials.access_key, scope, SIGNED_HEADERS, signature
    );

    SignedHeaders {
        host: params.host.to_string(),
        amz_date,
        content_sha256: payload_hash,
        authorization,
    }
}

/// URI-encode each path segment, preserving the separators
fn canonical_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.split('/')
        .map(|segment| {
            let decoded = urlencoding::decode(segment)
                .map(|cow| cow.into_owned())
                .unwrap_or_else(|_| segment.to_string());
            urlencoding::encode(&decoded).into_owned()
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Sort parameters by name then value, encoding both
fn canonical_query(query: &[(&str, &str)]) -> String {
    let mut pairs: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn hex_sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
