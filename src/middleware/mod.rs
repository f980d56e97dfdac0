//! Middleware for Trainstore.
//!
//! Authentication is a collaborator, not a concern of the store: an
//! injectable `Authenticator` strategy resolves the caller identity from
//! the request, and `require_auth` attaches it as a request extension.
//! Token issuance and verification live upstream (the default strategy
//! trusts identity headers asserted by the fronting gateway).

use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::AppState;

/// Identity of the caller, resolved per request.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: String,
    pub class_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Supervisor,
}

impl Role {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Self::Student),
            "supervisor" => Some(Self::Supervisor),
            _ => None,
        }
    }
}

impl Caller {
    /// Enforce the scope rule for student-owned resources: the class
    /// claim must match the path's class id, and the user id must match
    /// the path's student id unless the caller supervises that class.
    /// Mismatch is 403 regardless of whether the resource exists.
    pub fn verify_scope(&self, class_id: &str, student_id: &str) -> Result<()> {
        if self.class_id != class_id {
            return Err(Error::Forbidden);
        }
        if self.user_id != student_id && self.role != Role::Supervisor {
            return Err(Error::Forbidden);
        }
        Ok(())
    }
}

/// Strategy for resolving the caller identity from request headers.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Caller>;
}

/// Production authenticator: trusts the identity headers the fronting
/// gateway sets after verifying the caller's token.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayAuthenticator;

#[async_trait]
impl Authenticator for GatewayAuthenticator {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Caller> {
        let user_id = header_value(headers, "x-user-id")?;
        let class_id = header_value(headers, "x-class-id")?;
        let role = Role::from_str(&header_value(headers, "x-user-role")?)
            .ok_or(Error::Unauthenticated)?;

        Ok(Caller {
            user_id,
            class_id,
            role,
        })
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Result<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(Error::Unauthenticated)
}

/// Resolve a project and verify it belongs to the (class, student) pair
/// named in the request path. A missing project is 404; a project owned
/// by a different student or class is 403.
pub async fn resolve_project_access(
    state: &AppState,
    class_id: &str,
    student_id: &str,
    project_id: &str,
) -> Result<crate::db::Project> {
    let project = crate::db::get_project(&state.db, project_id).await?;
    if project.class_id != class_id || project.user_id != student_id {
        return Err(Error::Forbidden);
    }
    Ok(project)
}

/// Middleware that resolves the caller identity and injects it as a
/// `Caller` extension. Requests the authenticator cannot resolve are
/// rejected with 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> std::result::Result<Response, Error> {
    let caller = state.auth.authenticate(req.headers()).await?;
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(user: &str, class: &str, role: Role) -> Caller {
        Caller {
            user_id: user.to_string(),
            class_id: class.to_string(),
            role,
        }
    }

    #[test]
    fn student_may_only_access_own_resources() {
        let c = caller("alice", "class-1", Role::Student);
        assert!(c.verify_scope("class-1", "alice").is_ok());
        assert!(matches!(
            c.verify_scope("class-1", "bob"),
            Err(Error::Forbidden)
        ));
    }

    #[test]
    fn supervisor_may_access_students_in_own_class_only() {
        let c = caller("teacher", "class-1", Role::Supervisor);
        assert!(c.verify_scope("class-1", "alice").is_ok());
        assert!(matches!(
            c.verify_scope("class-2", "alice"),
            Err(Error::Forbidden)
        ));
    }

    #[tokio::test]
    async fn gateway_authenticator_requires_all_headers() {
        let auth = GatewayAuthenticator;

        let mut headers = HeaderMap::new();
        assert!(auth.authenticate(&headers).await.is_err());

        headers.insert("x-user-id", "alice".parse().unwrap());
        headers.insert("x-class-id", "class-1".parse().unwrap());
        headers.insert("x-user-role", "student".parse().unwrap());

        let caller = auth.authenticate(&headers).await.unwrap();
        assert_eq!(caller.user_id, "alice");
        assert_eq!(caller.role, Role::Student);
    }
}
