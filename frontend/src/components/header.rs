use shared::{Modality, VisionConfig};
use yew::prelude::*;

/// Top bar with the product name and whatever sits on the right (auth).
pub fn render_header(right: Html) -> Html {
    html! {
        <header class="app-header">
            <div class="brand">
                <i class="fa-solid fa-shirt"></i>
                <span>{" Vision"}</span>
            </div>
            <div class="top-right">{ right }</div>
        </header>
    }
}

pub fn render_hero() -> Html {
    html! {
        <section class="hero">
            <h1>{"Vision — AI for fashion"}</h1>
            <p class="subtitle">
                {"Search, segment, classify and detect garments with four production-ready APIs."}
            </p>
            <a class="analyze-btn" href="#apis">
                <i class="fa-solid fa-flask"></i>{" Explore the APIs"}
            </a>
        </section>
    }
}

/// Copy-paste snippet pointing at the configured API base.
pub fn render_integration(config: &VisionConfig) -> Html {
    let endpoint = config
        .endpoint(Modality::Classify)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| Modality::Classify.endpoint_path());
    let snippet = format!(
        "curl -X POST {} \\\n  -H \"Authorization: Bearer $VISION_API_TOKEN\" \\\n  -F image=@look.jpg \\\n  -F labels=robe,pull,veste",
        endpoint
    );

    html! {
        <section class="integration">
            <h2>{"Integrate in minutes"}</h2>
            <p>{"Every endpoint takes a multipart form and answers with JSON. One call costs one credit."}</p>
            <pre class="code-snippet"><code>{ snippet }</code></pre>
        </section>
    }
}
