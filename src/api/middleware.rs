use axum::{extract::Request, middleware::Next, response::Response};
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "fishfarm_session";

/// Issues or re-reads the session cookie and makes the session id
/// available to handlers as a request extension. Unlike a login wall,
/// every request gets a session; there is nothing to reject.
pub async fn session_middleware(cookies: Cookies, mut request: Request, next: Next) -> Response {
    let session = match cookies
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
    {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4();
            let mut cookie = Cookie::new(SESSION_COOKIE, id.to_string());
            cookie.set_path("/");
            cookies.add(cookie);
            id
        }
    };
    request.extensions_mut().insert(session);
    next.run(request).await
}
