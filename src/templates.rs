//! Server-rendered HTML for the two demo pages.

use crate::models::{Category, UserProfile};

/// Everything the suggestion page shows for one clothing category.
#[derive(Debug, Clone)]
pub struct OutfitSlot {
    pub category: Category,
    pub product_id: u32,
    pub caption: String,
    pub product_link: String,
}

/// Escape a value for interpolation into HTML text or attributes.
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{title}</title>\n\
<style>\n\
body {{ font-family: system-ui, sans-serif; max-width: 52rem; margin: 2rem auto; padding: 0 1rem; color: #222; }}\n\
.card {{ border: 1px solid #ddd; border-radius: 8px; padding: 1rem; margin: 1rem 0; }}\n\
.outfit {{ display: flex; gap: 1rem; align-items: flex-start; }}\n\
.outfit img {{ width: 160px; border-radius: 4px; }}\n\
button {{ padding: 0.4rem 0.9rem; margin-right: 0.5rem; cursor: pointer; }}\n\
textarea {{ width: 100%; min-height: 5rem; }}\n\
.muted {{ color: #777; }}\n\
</style>\n\
</head>\n\
<body>\n\
{body}\n\
</body>\n\
</html>\n",
        title = escape(title),
        body = body
    )
}

/// Landing page: the active profile, the feedback prompt and the profile
/// switcher. `show_feedback_form` re-renders the page with the feedback box
/// open instead of moving on to the suggestion page.
pub fn landing_page(profile: &UserProfile, show_feedback_form: bool) -> String {
    let mut body = String::new();

    body.push_str("<h1>Your Personal Stylist</h1>\n");
    body.push_str(
        "<p>A demo that turns a shopping profile into outfit suggestions \
drawn from a small clothing catalog.</p>\n",
    );

    body.push_str("<div class=\"card\">\n");
    body.push_str(&format!(
        "<h2>Shopping as: {}</h2>\n",
        escape(&profile.name)
    ));
    body.push_str(&format!(
        "<p>{} year old, {} aesthetic, size {}, budget ${} per item.</p>\n",
        profile.age,
        escape(&profile.aesthetic),
        escape(&profile.size),
        profile.budget
    ));
    body.push_str(&format!(
        "<p class=\"muted\">Shops for: {}. Recently browsed: {}.</p>\n",
        escape(&profile.event_type.join(", ")),
        escape(&profile.browsing_data.join(", "))
    ));
    body.push_str("</div>\n");

    body.push_str("<form method=\"post\" action=\"/\">\n");
    if show_feedback_form {
        body.push_str(
            "<p>We'd love to hear from you:</p>\n\
<textarea name=\"feedback_text\" placeholder=\"Tell us what you think...\"></textarea>\n\
<p><button type=\"submit\" name=\"gave_feedback\" value=\"submit\">Send feedback</button></p>\n",
        );
    } else {
        body.push_str(
            "<button type=\"submit\">Show my outfit</button>\n\
<button type=\"submit\" name=\"do_profile_switch\" value=\"yes\">Switch profile</button>\n\
<button type=\"submit\" name=\"gave_feedback\" value=\"yes\">Give feedback</button>\n",
        );
    }
    body.push_str("</form>\n");

    page("Your Personal Stylist", &body)
}

/// Suggestion page: one slot per category, with swap controls. An empty slot
/// list renders the degraded "nothing to recommend" message instead.
pub fn suggestion_page(profile: &UserProfile, slots: &[OutfitSlot]) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "<h1>An outfit for {}</h1>\n",
        escape(&profile.name)
    ));

    if slots.is_empty() {
        body.push_str(
            "<p class=\"muted\">No recommendations are available right now. \
The catalog images and caption cache need to be prepared first \
(see the ingest-catalog and enrich-captions jobs).</p>\n",
        );
        body.push_str("<p><a href=\"/\">Back to the start</a></p>\n");
        return page("Outfit suggestion", &body);
    }

    for slot in slots {
        body.push_str("<div class=\"card outfit\">\n");
        body.push_str(&format!(
            "<img src=\"/static/images/clothes/{id}.jpg\" alt=\"{caption}\">\n\
<img src=\"/static/images/models/{id}.jpg\" alt=\"Worn by a model\">\n",
            id = slot.product_id,
            caption = escape(&slot.caption)
        ));
        body.push_str("<div>\n");
        body.push_str(&format!("<h2>{}</h2>\n", escape(slot.category.as_str())));
        body.push_str(&format!("<p>{}</p>\n", escape(&slot.caption)));
        body.push_str(&format!(
            "<p><a href=\"{}\">View product</a></p>\n",
            escape(&slot.product_link)
        ));
        body.push_str(&format!(
            "<form method=\"post\" action=\"/suggestion\">\n\
<button type=\"submit\" name=\"swap\" value=\"{category}\">Swap {category}</button>\n\
</form>\n",
            category = slot.category
        ));
        body.push_str("</div>\n</div>\n");
    }

    body.push_str(
        "<form method=\"post\" action=\"/suggestion\">\n\
<button type=\"submit\" name=\"new_outfit\" value=\"yes\">New outfit</button>\n\
</form>\n\
<p><a href=\"/\">Back to the start</a></p>\n",
    );

    page("Outfit suggestion", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile;

    fn slot(category: Category, caption: &str) -> OutfitSlot {
        OutfitSlot {
            category,
            product_id: 465187,
            caption: caption.to_string(),
            product_link: "https://shop.example/products/465187".to_string(),
        }
    }

    #[test]
    fn escape_neutralizes_html() {
        assert_eq!(
            escape(r#"<b onmouseover="x('y')">&"#),
            "&lt;b onmouseover=&quot;x(&#x27;y&#x27;)&quot;&gt;&amp;"
        );
    }

    #[test]
    fn landing_shows_profile_and_actions() {
        let html = landing_page(profile::default_profile(), false);
        assert!(html.contains("Ava Chen"));
        assert!(html.contains("do_profile_switch"));
        assert!(html.contains("gave_feedback"));
        assert!(!html.contains("feedback_text"));
    }

    #[test]
    fn landing_with_feedback_form_shows_textarea() {
        let html = landing_page(profile::default_profile(), true);
        assert!(html.contains("feedback_text"));
        assert!(html.contains("value=\"submit\""));
    }

    #[test]
    fn suggestion_renders_one_slot_per_category() {
        let html = suggestion_page(
            profile::default_profile(),
            &[
                slot(Category::Tops, "A white cotton shirt."),
                slot(Category::Bottoms, "Navy chino trousers."),
            ],
        );
        assert!(html.contains("A white cotton shirt."));
        assert!(html.contains("Navy chino trousers."));
        assert!(html.contains("value=\"tops\""));
        assert!(html.contains("value=\"bottoms\""));
        assert!(html.contains("new_outfit"));
        assert!(html.contains("/static/images/clothes/465187.jpg"));
    }

    #[test]
    fn suggestion_without_slots_degrades_gracefully() {
        let html = suggestion_page(profile::default_profile(), &[]);
        assert!(html.contains("No recommendations"));
        assert!(!html.contains("new_outfit"));
    }

    #[test]
    fn caption_text_is_escaped() {
        let html = suggestion_page(
            profile::default_profile(),
            &[slot(Category::Tops, "<script>alert(1)</script>")],
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
