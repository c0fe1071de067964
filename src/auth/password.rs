use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::config::PasswordConfig;

/// Argon2id hasher with configurable cost. Verification of a PHC string uses the
/// parameters embedded in the hash, so raising the cost does not invalidate
/// existing users.
pub struct Passwords {
    argon2: Argon2<'static>,
    min_length: usize,
    decoy: String,
}

impl Passwords {
    pub fn new(cfg: &PasswordConfig) -> anyhow::Result<Self> {
        let params = Params::new(cfg.m_cost, cfg.t_cost, cfg.p_cost, None)
            .map_err(|e| anyhow::anyhow!("invalid argon2 params: {e}"))?;
        let mut passwords = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            min_length: cfg.min_length,
            decoy: String::new(),
        };
        passwords.decoy = passwords.hash("decoy-password-never-matches")?;
        Ok(passwords)
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    pub fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        match self.argon2.verify_password(plain.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(anyhow::anyhow!("verify error: {e}")),
        }
    }

    /// Burn one verification against a throwaway hash made with the configured
    /// cost. Used when the email is unknown so that path costs about as much
    /// as a wrong password.
    pub fn verify_decoy(&self, plain: &str) {
        let _ = self.verify(plain, &self.decoy);
    }
}

#[cfg(test)]
pub(crate) fn cheap() -> Passwords {
    Passwords::new(&PasswordConfig {
        m_cost: 256,
        t_cost: 1,
        p_cost: 1,
        min_length: 8,
    })
    .expect("cheap params are valid")
}
