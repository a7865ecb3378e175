//! Social share links for article pages

use serde::Serialize;

use super::url::encode_component;

/// A share link for one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLink {
    pub network: &'static str,
    pub label: &'static str,
    pub href: String,
}

/// Share links for a post title and its absolute URL
pub fn share_links(title: &str, url: &str) -> Vec<ShareLink> {
    let u = encode_component(url);
    let t = encode_component(title);
    let text = encode_component(&format!("{} {}", title, url));

    vec![
        ShareLink {
            network: "facebook",
            label: "Facebook",
            href: format!("https://www.facebook.com/sharer/sharer.php?u={}", u),
        },
        ShareLink {
            network: "twitter",
            label: "X",
            href: format!("https://twitter.com/intent/tweet?url={}&text={}", u, t),
        },
        ShareLink {
            network: "whatsapp",
            label: "WhatsApp",
            href: format!("https://api.whatsapp.com/send?text={}", text),
        },
        ShareLink {
            network: "linkedin",
            label: "LinkedIn",
            href: format!("https://www.linkedin.com/sharing/share-offsite/?url={}", u),
        },
        ShareLink {
            network: "telegram",
            label: "Telegram",
            href: format!("https://t.me/share/url?url={}&text={}", u, t),
        },
    ]
}
