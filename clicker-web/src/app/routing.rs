use crate::router::{Route, ViewLoad};
use std::collections::HashSet;
use yew::prelude::*;

/// Whether `route` can render its real view or still needs the placeholder.
#[must_use]
pub fn is_view_ready(route: Route, visited: &HashSet<Route>) -> bool {
    match route.load() {
        ViewLoad::Eager => true,
        ViewLoad::Lazy => visited.contains(&route),
    }
}

/// The visited set after navigating to `route`, or `None` when nothing changes.
fn mark_visited(route: Route, visited: &HashSet<Route>) -> Option<HashSet<Route>> {
    if is_view_ready(route, visited) {
        return None;
    }
    let mut next = visited.clone();
    next.insert(route);
    Some(next)
}

/// Load lazy views on their first navigation.
///
/// The first render of a lazy route shows the placeholder; the effect then
/// records the visit and the view renders from then on.
#[hook]
pub fn use_lazy_views(visited: &UseStateHandle<HashSet<Route>>, route: Route) {
    let visited = visited.clone();
    use_effect_with(route, move |route| {
        if let Some(next) = mark_visited(*route, &visited) {
            log::debug!("Loading view {}", route.name());
            visited.set(next);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eager_views_are_always_ready() {
        assert!(is_view_ready(Route::Home, &HashSet::new()));
        assert!(is_view_ready(Route::NotFound, &HashSet::new()));
    }

    #[test]
    fn lazy_views_load_once() {
        let visited = HashSet::new();
        assert!(!is_view_ready(Route::Tasks, &visited));

        let visited = mark_visited(Route::Tasks, &visited).expect("first visit loads");
        assert!(is_view_ready(Route::Tasks, &visited));
        assert!(mark_visited(Route::Tasks, &visited).is_none());
        assert!(!is_view_ready(Route::Swap, &visited));
    }

    #[test]
    fn eager_navigation_leaves_visits_untouched() {
        assert!(mark_visited(Route::Home, &HashSet::new()).is_none());
    }
}
