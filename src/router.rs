//! Static route table and path matching.
//!
//! DESIGN
//! ======
//! Routes are declared once at startup with their requirement annotations.
//! Children inherit their parent's path prefix, and a match carries the full
//! chain of matched records so the guard can ask "does any segment require
//! this?" the same way for flat and nested tables.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use std::collections::BTreeMap;

/// Requirement annotations attached to a destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_admin: bool,
}

impl RouteMeta {
    pub const PUBLIC: Self = Self { requires_auth: false, requires_admin: false };
    pub const AUTH: Self = Self { requires_auth: true, requires_admin: false };
    pub const ADMIN: Self = Self { requires_auth: true, requires_admin: true };
}

#[derive(Clone, Debug)]
pub struct Route {
    /// Absolute for top-level routes, relative to the parent for children.
    /// Segments starting with `:` capture a parameter.
    pub path: &'static str,
    pub name: &'static str,
    pub meta: RouteMeta,
    pub children: Vec<Route>,
}

impl Route {
    #[must_use]
    pub fn new(path: &'static str, name: &'static str) -> Self {
        Self { path, name, meta: RouteMeta::PUBLIC, children: Vec::new() }
    }

    #[must_use]
    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn children(mut self, children: Vec<Route>) -> Self {
        self.children = children;
        self
    }
}

/// A resolved navigation target.
#[derive(Clone, Debug)]
pub struct RouteMatch<'a> {
    /// Requested path with query string and trailing slash removed.
    pub path: String,
    /// Matched records, outermost first. Never empty.
    pub matched: Vec<&'a Route>,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch<'_> {
    /// The innermost matched record.
    #[must_use]
    pub fn route(&self) -> &Route {
        self.matched[self.matched.len() - 1]
    }

    #[must_use]
    pub fn requires_auth(&self) -> bool {
        self.matched.iter().any(|route| route.meta.requires_auth)
    }

    #[must_use]
    pub fn requires_admin(&self) -> bool {
        self.matched.iter().any(|route| route.meta.requires_admin)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The library front-end's destinations.
    #[must_use]
    pub fn library() -> Self {
        Self::new(vec![
            Route::new("/", "Home"),
            Route::new("/login", "Login"),
            Route::new("/register", "Register"),
            Route::new("/books", "BookList"),
            Route::new("/books/:id", "BookDetail"),
            Route::new("/profile", "UserProfile").meta(RouteMeta::AUTH),
            Route::new("/borrows", "BorrowHistory").meta(RouteMeta::AUTH),
            Route::new("/admin", "AdminDashboard").meta(RouteMeta::ADMIN),
            Route::new("/admin/books", "AdminBookManage").meta(RouteMeta::ADMIN),
            Route::new("/admin/users", "AdminUserManage").meta(RouteMeta::ADMIN),
            Route::new("/admin/borrows", "AdminBorrowManage").meta(RouteMeta::ADMIN),
        ])
    }

    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Find the first route (in declaration order, depth first) matching `path`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = normalize_path(path);
        let segments = split_segments(&path);
        for route in &self.routes {
            let mut matched = Vec::new();
            let mut params = BTreeMap::new();
            if match_route(route, &segments, &mut matched, &mut params) {
                return Some(RouteMatch { path, matched, params });
            }
        }
        None
    }

    /// Look up a route by name, searching children too.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Route> {
        fn find<'a>(routes: &'a [Route], name: &str) -> Option<&'a Route> {
            routes.iter().find_map(|route| {
                if route.name == name { Some(route) } else { find(&route.children, name) }
            })
        }
        find(&self.routes, name)
    }
}

/// Strip the query string, fragment and trailing slash; ensure a leading `/`.
pub(crate) fn normalize_path(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let trimmed = raw[..end].trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

fn match_route<'a>(
    route: &'a Route,
    segments: &[&str],
    matched: &mut Vec<&'a Route>,
    params: &mut BTreeMap<String, String>,
) -> bool {
    let own = split_segments(route.path);
    if own.len() > segments.len() {
        return false;
    }

    let mut captured = Vec::new();
    for (pattern, actual) in own.iter().zip(segments) {
        if let Some(name) = pattern.strip_prefix(':') {
            captured.push((name.to_owned(), (*actual).to_owned()));
        } else if pattern != actual {
            return false;
        }
    }

    let rest = &segments[own.len()..];
    matched.push(route);
    let depth = matched.len();

    let found = rest.is_empty()
        || route.children.iter().any(|child| {
            matched.truncate(depth);
            match_route(child, rest, matched, params)
        });

    if found {
        params.extend(captured);
    } else {
        matched.truncate(depth - 1);
    }
    found
}
