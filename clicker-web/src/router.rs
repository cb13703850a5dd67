use yew_router::prelude::*;

#[derive(Clone, Copy, Debug, Routable, PartialEq, Eq, Hash)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/friends")]
    Friends,
    #[at("/swap")]
    Swap,
    #[at("/tasks")]
    Tasks,
    #[at("/404")]
    #[not_found]
    NotFound,
}

/// How a view is brought in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewLoad {
    /// Rendered straight away.
    Eager,
    /// Shows a placeholder until first navigated to.
    Lazy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavEntry {
    pub route: Route,
    pub name: &'static str,
    pub label: &'static str,
    pub load: ViewLoad,
}

/// Navigable views, in bottom-bar order.
pub const NAV_MAP: [NavEntry; 4] = [
    NavEntry {
        route: Route::Home,
        name: "home",
        label: "Tap",
        load: ViewLoad::Eager,
    },
    NavEntry {
        route: Route::Friends,
        name: "friends",
        label: "Friends",
        load: ViewLoad::Lazy,
    },
    NavEntry {
        route: Route::Swap,
        name: "swap",
        label: "Swap",
        load: ViewLoad::Lazy,
    },
    NavEntry {
        route: Route::Tasks,
        name: "tasks",
        label: "Tasks",
        load: ViewLoad::Lazy,
    },
];

impl Route {
    #[must_use]
    pub fn entry(self) -> Option<&'static NavEntry> {
        NAV_MAP.iter().find(|entry| entry.route == self)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.entry().map_or("not-found", |entry| entry.name)
    }

    #[must_use]
    pub fn load(self) -> ViewLoad {
        self.entry().map_or(ViewLoad::Eager, |entry| entry.load)
    }
}
