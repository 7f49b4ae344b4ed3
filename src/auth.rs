use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, TokenData, Validation};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use snafu::{Location, OptionExt as _, ResultExt as _, Snafu};

use crate::api::{ApiError, App};
use crate::database::Record;
use crate::model::User;

/// Name of the cookie a browser session keeps its token in.
pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub session_secret: String,
}

/// Claims of a session token.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Session {
    pub sub: String,
    pub email: String,
    pub exp: i64,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AuthError {
    #[snafu(display("failed to decode JWT token"))]
    Decode {
        source: jsonwebtoken::errors::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to encode JWT token"))]
    Encode {
        source: jsonwebtoken::errors::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("request is not authenticated"))]
    ExtractToken {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("session subject `{subject}` is not a user id"))]
    InvalidSubject {
        subject: String,
        #[snafu(implicit)]
        location: Location,
    },
}

/// Verifies the session tokens minted by the identity provider.
#[derive(Debug, Clone)]
pub struct Authenticator {
    pub secret: SecretString,
    pub algorithm: Algorithm,
    pub validation: Validation,
}

impl Authenticator {
    pub fn from_config(config: &SessionConfig) -> Self {
        let algorithm = Algorithm::HS256;

        Self {
            secret: SecretString::new(config.session_secret.clone()),
            algorithm,
            validation: Validation::new(algorithm),
        }
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.expose_secret().as_bytes())
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.expose_secret().as_bytes())
    }

    fn header(&self) -> jsonwebtoken::Header {
        jsonwebtoken::Header::new(self.algorithm)
    }

    pub fn expiration(&self) -> i64 {
        (Utc::now() + Duration::days(7)).timestamp()
    }

    pub fn decode(&self, token: &str) -> Result<TokenData<Session>, AuthError> {
        jsonwebtoken::decode(token, &self.decoding_key(), &self.validation).context(DecodeSnafu)
    }

    pub fn encode(&self, claims: &Session) -> Result<String, AuthError> {
        jsonwebtoken::encode(&self.header(), claims, &self.encoding_key()).context(EncodeSnafu)
    }

    /// Mints a week-long token for `user`. Meant for trusted callers; the service itself never logs anyone in.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let claims = Session {
            sub: user.id.key(),
            email: user.email.clone(),
            exp: self.expiration(),
        };

        self.encode(&claims)
    }

    /// Checks the signature and expiry of `token` and returns who it belongs to.
    pub fn verify(&self, token: &str) -> Result<User, AuthError> {
        let TokenData { claims, .. } = self.decode(token)?;

        let id = Record::parse(&claims.sub).context(InvalidSubjectSnafu {
            subject: claims.sub.as_str(),
        })?;

        Ok(User::new(id, claims.email))
    }
}

/// The caller of a request, taken from the bearer token or else the session cookie.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[axum::async_trait]
impl FromRequestParts<App> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, app: &App) -> Result<Self, Self::Rejection> {
        let bearer = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, app)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string());

        let token = match bearer {
            Some(token) => Some(token),
            None => CookieJar::from_headers(&parts.headers)
                .get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_string()),
        };

        let user = token
            .context(ExtractTokenSnafu)
            .and_then(|token| app.authenticator.verify(&token))
            .map_err(|error| {
                tracing::debug!(%error, "rejected request");
                ApiError::from(error)
            })?;

        Ok(CurrentUser(user))
    }
}
