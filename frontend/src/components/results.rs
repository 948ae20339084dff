use shared::ScoreBar;
use yew::prelude::*;

pub fn render_score_bars(bars: &[ScoreBar]) -> Html {
    html! {
        <div class="result-bars">
            { for bars.iter().map(|bar| html! {
                <div class="result-item">
                    <div class="result-label">{ &bar.label }</div>
                    <div class="result-bar-container">
                        <div class="result-bar" style={format!("width: {}%", bar.width)}></div>
                    </div>
                    <div class="result-value">{ &bar.percent }</div>
                </div>
            })}
        </div>
    }
}
