use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, PublicUser, RegisterRequest, RegisterResponse},
        jwt::JwtKeys,
    },
    error::AppError,
    state::AppState,
};

/// Width of the `users.name` and `users.email` columns.
const MAX_FIELD_CHARS: usize = 100;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn hash_blocking(state: &AppState, plain: String) -> Result<String, AppError> {
    let passwords = state.passwords.clone();
    tokio::task::spawn_blocking(move || passwords.hash(&plain))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(AppError::Internal)
}

async fn verify_blocking(
    state: &AppState,
    plain: String,
    hash: Option<String>,
) -> Result<bool, AppError> {
    let passwords = state.passwords.clone();
    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => passwords.verify(&plain, &hash),
        None => {
            passwords.verify_decoy(&plain);
            Ok(false)
        }
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?
    .map_err(AppError::Internal)
}

pub async fn register(
    state: &AppState,
    payload: RegisterRequest,
) -> Result<RegisterResponse, AppError> {
    let name = payload.name.trim().to_string();
    let email = normalize_email(&payload.email);

    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if name.chars().count() > MAX_FIELD_CHARS {
        return Err(AppError::Validation("Name is too long".into()));
    }
    if email.chars().count() > MAX_FIELD_CHARS {
        warn!("email too long");
        return Err(AppError::Validation("Email is too long".into()));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if payload.password.chars().count() < state.passwords.min_length() {
        warn!("password too short");
        return Err(AppError::Validation("Password too short".into()));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict);
    }

    let hash = hash_blocking(state, payload.password).await?;
    // A concurrent registration may still win the race; the unique index turns
    // that into RepoError::Duplicate, which maps to Conflict.
    let user = state.users.create(&name, &email, &hash).await?;

    let token = state.keys.sign(user.id, &user.email).map_err(AppError::Internal)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(RegisterResponse {
        message: "User registered successfully",
        user: PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
        },
        token,
    })
}

pub async fn login(state: &AppState, payload: LoginRequest) -> Result<LoginResponse, AppError> {
    let email = normalize_email(&payload.email);

    let user = state.users.find_by_email(&email).await?;
    let ok = verify_blocking(
        state,
        payload.password,
        user.as_ref().map(|u| u.password_hash.clone()),
    )
    .await?;

    let user = match user {
        Some(user) if ok => user,
        Some(user) => {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }
        None => {
            warn!(email = %email, "login unknown email");
            return Err(AppError::InvalidCredentials);
        }
    };

    let token = state.keys.sign(user.id, &user.email).map_err(AppError::Internal)?;

    info!(user_id = %user.id, "user logged in");
    Ok(LoginResponse {
        message: "Login successful",
        token,
    })
}

/// Resolve a bearer token to its user ID.
pub fn verify(keys: &JwtKeys, token: Option<&str>) -> Result<Uuid, AppError> {
    let token = token.ok_or(AppError::Unauthenticated)?;
    match keys.verify(token) {
        Ok(claims) => Ok(claims.sub),
        Err(e) => {
            warn!(error = %e, "invalid or expired token");
            Err(AppError::Unauthenticated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_req(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("fan@example.com"));
        assert!(!is_valid_email("fan@example"));
        assert!(!is_valid_email("fan example.com"));
        assert!(!is_valid_email(""));
    }

    #[tokio::test]
    async fn register_returns_user_and_verifiable_token() {
        let state = AppState::fake();
        let res = register(&state, register_req("Ann", " Ann@Example.com ", "hunter2hunter2"))
            .await
            .expect("register");
        assert_eq!(res.user.name, "Ann");
        assert_eq!(res.user.email, "ann@example.com");
        assert_eq!(verify(&state.keys, Some(&res.token)).unwrap(), res.user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let state = AppState::fake();
        register(&state, register_req("Ann", "ann@example.com", "hunter2hunter2"))
            .await
            .unwrap();
        let err = register(&state, register_req("Other", "ANN@example.com", "different-pass"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict));
    }

    #[tokio::test]
    async fn stored_password_is_hashed() {
        let state = AppState::fake();
        register(&state, register_req("Ann", "ann@example.com", "hunter2hunter2"))
            .await
            .unwrap();
        let user = state.users.find_by_email("ann@example.com").await.unwrap().unwrap();
        assert_ne!(user.password_hash, "hunter2hunter2");
        assert!(!user.password_hash.contains("hunter2hunter2"));
        assert!(state.passwords.verify("hunter2hunter2", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn register_validates_input() {
        let state = AppState::fake();
        let cases = [
            register_req("", "ann@example.com", "hunter2hunter2"),
            register_req("Ann", "not-an-email", "hunter2hunter2"),
            register_req("Ann", "ann@example.com", "short"),
        ];
        for req in cases {
            let err = register(&state, req).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{err:?}");
        }
    }

    #[tokio::test]
    async fn register_rejects_fields_wider_than_their_columns() {
        let state = AppState::fake();
        let long_name = "n".repeat(MAX_FIELD_CHARS + 1);
        let long_email = format!("{}@example.com", "a".repeat(MAX_FIELD_CHARS));
        for req in [
            register_req(&long_name, "ann@example.com", "hunter2hunter2"),
            register_req("Ann", &long_email, "hunter2hunter2"),
        ] {
            let err = register(&state, req).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{err:?}");
            assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        }

        let widest = "é".repeat(MAX_FIELD_CHARS);
        register(&state, register_req(&widest, "ann@example.com", "hunter2hunter2"))
            .await
            .expect("100 characters fit");
    }

    #[tokio::test]
    async fn login_with_correct_password_succeeds() {
        let state = AppState::fake();
        let reg = register(&state, register_req("Ann", "ann@example.com", "hunter2hunter2"))
            .await
            .unwrap();
        let res = login(&state, login_req("ann@example.com", "hunter2hunter2"))
            .await
            .expect("login");
        assert_eq!(verify(&state.keys, Some(&res.token)).unwrap(), reg.user.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_identical() {
        let state = AppState::fake();
        register(&state, register_req("Ann", "ann@example.com", "hunter2hunter2"))
            .await
            .unwrap();

        let wrong = login(&state, login_req("ann@example.com", "hunter3hunter3"))
            .await
            .unwrap_err();
        let unknown = login(&state, login_req("bob@example.com", "hunter2hunter2"))
            .await
            .unwrap_err();

        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn verify_requires_a_token() {
        let state = AppState::fake();
        assert!(matches!(verify(&state.keys, None), Err(AppError::Unauthenticated)));
        assert!(matches!(
            verify(&state.keys, Some("garbage")),
            Err(AppError::Unauthenticated)
        ));
    }
}
