//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"書類分類 - 住宅ローン申込書類"</h1>
        </header>
    }
}
