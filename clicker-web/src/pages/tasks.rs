use yew::prelude::*;

#[function_component(TasksPage)]
pub fn tasks_page() -> Html {
    html! {
        <section class="panel tasks" data-testid="tasks-screen">
            <h1>{ "Tasks" }</h1>
            <p class="muted">{ "No tasks yet. Keep tapping!" }</p>
        </section>
    }
}
