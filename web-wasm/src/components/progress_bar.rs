//! 送信中インジケーター
//!
//! 応答が一括で返るため進捗率は持たない

use leptos::prelude::*;

#[component]
pub fn ProgressBar() -> impl IntoView {
    view! {
        <div class="progress-container">
            <div class="progress-bar">
                <div class="progress-fill indeterminate" />
            </div>
            <p class="progress-text">"分類中..."</p>
        </div>
    }
}
