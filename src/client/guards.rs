use crate::client::context::AppContext;

pub const SIGN_IN_PATH: &str = "/sign-in";

/// Who may enter a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Public,
    Authenticated,
    AdminOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(&'static str),
}

impl Guard {
    pub fn check(self, ctx: &AppContext) -> Access {
        let allowed = match self {
            Guard::Public => true,
            Guard::Authenticated => ctx.is_signed_in(),
            Guard::AdminOnly => ctx.is_admin(),
        };
        if allowed {
            Access::Allow
        } else {
            Access::Redirect(SIGN_IN_PATH)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    About,
    SignIn,
    SignUp,
    Dashboard,
    CreatePost,
    Projects,
    Post,
    NotFound,
}

#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub pattern: &'static str,
    pub page: Page,
    pub guard: Guard,
}

pub const ROUTES: &[Route] = &[
    Route {
        pattern: "/",
        page: Page::Home,
        guard: Guard::Public,
    },
    Route {
        pattern: "/about",
        page: Page::About,
        guard: Guard::Public,
    },
    Route {
        pattern: "/sign-in",
        page: Page::SignIn,
        guard: Guard::Public,
    },
    Route {
        pattern: "/sign-up",
        page: Page::SignUp,
        guard: Guard::Public,
    },
    Route {
        pattern: "/projects",
        page: Page::Projects,
        guard: Guard::Public,
    },
    Route {
        pattern: "/post/:slug",
        page: Page::Post,
        guard: Guard::Public,
    },
    Route {
        pattern: "/dashboard",
        page: Page::Dashboard,
        guard: Guard::Authenticated,
    },
    Route {
        pattern: "/create-post",
        page: Page::CreatePost,
        guard: Guard::AdminOnly,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Page),
    Redirect(&'static str),
}

fn matches(pattern: &str, path: &str) -> bool {
    let mut pattern_parts = pattern.split('/').filter(|s| !s.is_empty());
    let mut path_parts = path.split('/').filter(|s| !s.is_empty());
    loop {
        match (pattern_parts.next(), path_parts.next()) {
            (None, None) => return true,
            (Some(p), Some(_)) if p.starts_with(':') => continue,
            (Some(p), Some(s)) if p == s => continue,
            _ => return false,
        }
    }
}

/// Decide what to show for `path` (query string ignored).
pub fn resolve(path: &str, ctx: &AppContext) -> Navigation {
    let path = path.split(['?', '#']).next().unwrap_or("/");
    match ROUTES.iter().find(|route| matches(route.pattern, path)) {
        Some(route) => match route.guard.check(ctx) {
            Access::Allow => Navigation::Render(route.page),
            Access::Redirect(to) => Navigation::Redirect(to),
        },
        None => Navigation::Render(Page::NotFound),
    }
}
