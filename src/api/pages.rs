//! Server-rendered pages.
//!
//! maud escapes every interpolated value. Entry text is the single
//! exception: it is written through `PreEscaped`, so markup in it renders.

use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::db::Entry;

pub const EMPTY_LISTING: &str = "No entries here so far";

/// Inline CSS shared by every page.
const PAGE_CSS: &str = r#"
*{box-sizing:border-box}
body{font-family:Georgia,serif;background:#eee;margin:0;padding:1.5rem 1rem;color:#222}
.page{max-width:46em;margin:0 auto;background:#fff;border:1px solid #ccc;padding:.8em 1.2em}
h1{color:#377ba8;border-bottom:2px solid #eee;margin:0 0 .6em}
h1 a{color:inherit;text-decoration:none}
h2{color:#377ba8;font-size:1.2em;margin:0}
.flash{background:#cee5f5;padding:.5em;border:1px solid #aacbe2;margin-bottom:.6em}
.entry-form dl{margin:0}
.entry-form dt{font-weight:bold;margin-top:.4em}
.entry-form dd{margin:0 0 .4em}
.entry-form input[type=text],.entry-form textarea{width:100%}
.filter{margin:1em 0;padding:.5em 0;border-top:1px solid #eee;border-bottom:1px solid #eee}
.entries{list-style:none;margin:0;padding:0}
.entries li{margin:.8em 0;padding-bottom:.6em;border-bottom:1px dashed #ddd}
.category{font-size:.8em;color:#777}
.actions{display:flex;gap:.5em;margin-top:.4em}
.actions form{margin:0}
.error{text-align:center;padding:2em 0}
"#;

fn layout(title: &str, messages: &[String], content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                div class="page" {
                    h1 { a href="/" { "Microblog" } }
                    @for message in messages {
                        div class="flash" { (message) }
                    }
                    (content)
                }
            }
        }
    }
}

/// The listing page.
///
/// `categories` is `None` on a filtered listing; the category picker then
/// becomes a free-text field and a link back to the full listing appears.
pub fn listing(entries: &[Entry], categories: Option<&[String]>, messages: &[String]) -> Markup {
    let content = html! {
        form class="entry-form" action="/add" method="post" {
            dl {
                dt { label for="title" { "Title:" } }
                dd { input type="text" size="30" name="title" id="title" required; }
                dt { label for="category" { "Category:" } }
                dd { input type="text" size="30" name="category" id="category" list="known-categories" required; }
                dt { label for="text" { "Text:" } }
                dd { textarea name="text" id="text" rows="5" cols="40" {} }
                dd { input type="submit" value="Share"; }
            }
        }
        form class="filter" action="/filter" method="get" {
            label for="filter" { "Filter by category: " }
            @if let Some(categories) = categories {
                select name="filter" id="filter" {
                    option value="" { "All categories" }
                    @for category in categories {
                        option value=(category) { (category) }
                    }
                }
                datalist id="known-categories" {
                    @for category in categories {
                        option value=(category) {}
                    }
                }
            } @else {
                input type="text" name="filter" id="filter";
            }
            " "
            input type="submit" value="Filter";
            @if categories.is_none() {
                " "
                a href="/" { "Show all entries" }
            }
        }
        ul class="entries" {
            @for entry in entries {
                li {
                    h2 { (entry.title) }
                    span class="category" { (entry.category) }
                    div class="text" { (PreEscaped(&entry.text)) }
                    div class="actions" {
                        form action="/edit" method="post" {
                            input type="hidden" name="edit" value=(entry.id);
                            input type="submit" value="Edit";
                        }
                        form action="/delete" method="post" {
                            input type="hidden" name="delete" value=(entry.id);
                            input type="submit" value="Delete";
                        }
                    }
                }
            }
            @if entries.is_empty() {
                li { em { (EMPTY_LISTING) } }
            }
        }
    };

    layout("Microblog", messages, content)
}

/// Edit form pre-populated with an entry's current fields.
pub fn editor(entry: &Entry, messages: &[String]) -> Markup {
    let content = html! {
        h2 { "Edit entry" }
        form class="entry-form" action="/edit-success" method="post" {
            input type="hidden" name="id" value=(entry.id);
            dl {
                dt { label for="title" { "Title:" } }
                dd { input type="text" size="30" name="title" id="title" value=(entry.title) required; }
                dt { label for="category" { "Category:" } }
                dd { input type="text" size="30" name="category" id="category" value=(entry.category) required; }
                dt { label for="text" { "Text:" } }
                dd { textarea name="text" id="text" rows="5" cols="40" { (entry.text) } }
                dd {
                    input type="submit" value="Save";
                    " "
                    a href="/" { "Cancel" }
                }
            }
        }
    };

    layout("Edit entry · Microblog", messages, content)
}

pub fn error_page(status: StatusCode, message: &str) -> Markup {
    let title = status.canonical_reason().unwrap_or("Error");

    let content = html! {
        div class="error" {
            h2 { (status.as_u16()) " " (title) }
            p { (message) }
            a href="/" { "Back to all entries" }
        }
    };

    layout(title, &[], content)
}
