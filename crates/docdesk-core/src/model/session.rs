use serde::{Deserialize, Serialize};

use crate::error::{DocdeskError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(alias = "username")]
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Client-held proof of authentication plus the cached identity it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub company: Company,
    pub token: String,
}

impl Session {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(DocdeskError::InvalidInput(
                "Email and password are required".into(),
            ));
        }
        Ok(())
    }
}

/// `POST /api/auth/login` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    pub company: Company,
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Self {
            user: resp.user,
            company: resp.company,
            token: resp.token,
        }
    }
}

/// `GET /api/auth/me` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub user: User,
    pub company: Company,
}

/// Registration payload. Creates a company and its first (admin) user.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub company_name: String,
    pub company_email: String,
    pub username: String,
    pub user_email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("Company name", &self.company_name),
            ("Company email", &self.company_email),
            ("Full name", &self.username),
            ("Email", &self.user_email),
            ("Password", &self.password),
        ];
        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(DocdeskError::InvalidInput(format!("{label} is required")));
            }
        }
        for (label, value) in [
            ("Company email", &self.company_email),
            ("Email", &self.user_email),
        ] {
            if !value.contains('@') {
                return Err(DocdeskError::InvalidInput(format!(
                    "{label} is not a valid email address"
                )));
            }
        }
        Ok(())
    }
}
