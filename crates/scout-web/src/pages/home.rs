//! Home Page

use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="hero">
                <h1>"scout"</h1>
                <p class="tagline">"Search-augmented AI assistant built in Rust"</p>
                <div class="cta">
                    <a href="/chat" class="btn btn-primary">"Start Chatting"</a>
                </div>
            </header>

            <section class="features">
                <div class="feature">
                    <h3>"📚 Grounded"</h3>
                    <p>"Answers backed by Wikipedia, arXiv, and live web search."</p>
                </div>
                <div class="feature">
                    <h3>"🔑 Your Key"</h3>
                    <p>"Bring your own Groq API key. It is sent per request, never stored."</p>
                </div>
                <div class="feature">
                    <h3>"⚡ Fast"</h3>
                    <p>"Rust-native backend with streaming responses over hosted models."</p>
                </div>
            </section>
        </div>
    }
}
