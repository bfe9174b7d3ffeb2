//! RFC 2617 digest access authentication
//!
//! The device API challenges every request. The HTTP client sends each request
//! once, and when the reply is a 401 carrying a `WWW-Authenticate: Digest`
//! header, answers the challenge with a computed `Authorization` header on a
//! single second round trip. Callers of the client never see the exchange.
//!
//! Only the MD5 algorithm with optional `qop=auth` is supported, which is what
//! the target API issues. Nothing is cached between calls, so the nonce count
//! is always `00000001`.

use crate::error::{IndigoError, Result};
use rand::RngCore;

const NONCE_COUNT: &str = "00000001";

/// Parsed `WWW-Authenticate: Digest ...` challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
    pub qop: Option<String>,
    pub opaque: Option<String>,
    pub algorithm: Option<String>,
}

impl DigestChallenge {
    /// Parse a challenge header value such as
    /// `Digest realm="indigo", nonce="abc123", qop="auth"`.
    pub fn parse(header: &str) -> Result<Self> {
        let parameters = header
            .strip_prefix("Digest ")
            .or_else(|| header.strip_prefix("digest "))
            .ok_or_else(|| {
                IndigoError::authentication("server challenge is not a digest challenge")
            })?;

        let mut realm = None;
        let mut nonce = None;
        let mut qop = None;
        let mut opaque = None;
        let mut algorithm = None;
        for part in split_parameters(parameters) {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').to_string();
            match key.trim().to_ascii_lowercase().as_str() {
                "realm" => realm = Some(value),
                "nonce" => nonce = Some(value),
                "qop" => qop = Some(value),
                "opaque" => opaque = Some(value),
                "algorithm" => algorithm = Some(value),
                _ => {}
            }
        }

        Ok(Self {
            realm: realm
                .ok_or_else(|| IndigoError::authentication("digest challenge missing realm"))?,
            nonce: nonce
                .ok_or_else(|| IndigoError::authentication("digest challenge missing nonce"))?,
            qop,
            opaque,
            algorithm,
        })
    }
}

/// Compute the `Authorization` header answering `challenge` for one request.
pub fn authorization_header(
    challenge: &DigestChallenge,
    username: &str,
    password: &str,
    method: &str,
    uri: &str,
) -> Result<String> {
    let mut cnonce_bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut cnonce_bytes);
    let cnonce = hex::encode(cnonce_bytes);
    authorization_header_with_cnonce(challenge, username, password, method, uri, &cnonce)
}

fn authorization_header_with_cnonce(
    challenge: &DigestChallenge,
    username: &str,
    password: &str,
    method: &str,
    uri: &str,
    cnonce: &str,
) -> Result<String> {
    if let Some(algorithm) = &challenge.algorithm {
        if !algorithm.eq_ignore_ascii_case("md5") {
            return Err(IndigoError::authentication(format!(
                "unsupported digest algorithm: {algorithm}"
            )));
        }
    }

    let qop = match challenge.qop.as_deref() {
        None => None,
        Some(offered) if offered.split(',').any(|token| token.trim() == "auth") => Some("auth"),
        Some(offered) => {
            return Err(IndigoError::authentication(format!(
                "unsupported digest qop: {offered}"
            )))
        }
    };

    let ha1 = md5_hex(&format!("{username}:{}:{password}", challenge.realm));
    let ha2 = md5_hex(&format!("{method}:{uri}"));
    let response = match qop {
        Some(qop) => md5_hex(&format!(
            "{ha1}:{}:{NONCE_COUNT}:{cnonce}:{qop}:{ha2}",
            challenge.nonce
        )),
        None => md5_hex(&format!("{ha1}:{}:{ha2}", challenge.nonce)),
    };

    let mut header = format!(
        "Digest username=\"{username}\", realm=\"{}\", nonce=\"{}\", uri=\"{uri}\", response=\"{response}\"",
        challenge.realm, challenge.nonce
    );
    if let Some(qop) = qop {
        header.push_str(&format!(", qop={qop}, nc={NONCE_COUNT}, cnonce=\"{cnonce}\""));
    }
    if let Some(opaque) = &challenge.opaque {
        header.push_str(&format!(", opaque=\"{opaque}\""));
    }
    Ok(header)
}

/// Split challenge parameters on commas outside quoted strings.
fn split_parameters(parameters: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in parameters.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input))
}
