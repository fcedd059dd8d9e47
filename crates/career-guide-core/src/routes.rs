//! Fixed route table and the bottom navigation dock.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    ProductCompanies,
    ServiceCompanies,
    ChatBot,
    AboutUs,
}

impl Route {
    pub fn all() -> Vec<Route> {
        vec![
            Route::Home,
            Route::ProductCompanies,
            Route::ServiceCompanies,
            Route::ChatBot,
            Route::AboutUs,
        ]
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::ProductCompanies => "/ProductCompanies",
            Route::ServiceCompanies => "/ServiceCompanies",
            Route::ChatBot => "/ChatBot",
            Route::AboutUs => "/AboutUs",
        }
    }

    /// Resolve a path such as `/ChatBot` or `#/chatbot`.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim().trim_start_matches('#');
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        Route::all()
            .into_iter()
            .find(|route| route.path().eq_ignore_ascii_case(path))
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::ProductCompanies => "Product Companies",
            Route::ServiceCompanies => "Service Companies",
            Route::ChatBot => "Chatbot",
            Route::AboutUs => "About Us",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockItem {
    pub title: &'static str,
    pub route: Route,
}

/// The persistent bottom navigation. Destinations are fixed.
pub struct NavDock;

impl NavDock {
    pub const ITEMS: [DockItem; 3] = [
        DockItem {
            title: "Home",
            route: Route::Home,
        },
        DockItem {
            title: "Chatbot",
            route: Route::ChatBot,
        },
        DockItem {
            title: "About Us",
            route: Route::AboutUs,
        },
    ];

    pub fn items() -> &'static [DockItem] {
        &Self::ITEMS
    }

    /// Dock slot highlighted for `route`, if it has one.
    pub fn position(route: Route) -> Option<usize> {
        Self::ITEMS.iter().position(|item| item.route == route)
    }

    /// The dock item after (or before) the one for `route`, wrapping.
    /// Routes without a slot start from Home.
    pub fn cycle(route: Route, forward: bool) -> Route {
        let len = Self::ITEMS.len();
        let next = match Self::position(route) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        Self::ITEMS[next].route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_resolve_loosely() {
        assert_eq!(Route::from_path("/"), Some(Route::Home));
        assert_eq!(Route::from_path("#/"), Some(Route::Home));
        assert_eq!(Route::from_path("/ChatBot"), Some(Route::ChatBot));
        assert_eq!(Route::from_path("/chatbot/"), Some(Route::ChatBot));
        assert_eq!(Route::from_path("#/AboutUs"), Some(Route::AboutUs));
        assert_eq!(Route::from_path("/careers"), None);
        assert_eq!(Route::from_path(""), None);
    }

    #[test]
    fn every_route_round_trips_its_path() {
        for route in Route::all() {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn dock_cycles_through_fixed_items() {
        assert_eq!(NavDock::cycle(Route::Home, true), Route::ChatBot);
        assert_eq!(NavDock::cycle(Route::AboutUs, true), Route::Home);
        assert_eq!(NavDock::cycle(Route::Home, false), Route::AboutUs);
        assert_eq!(NavDock::cycle(Route::ProductCompanies, true), Route::Home);
        assert_eq!(NavDock::position(Route::ServiceCompanies), None);
    }
}
