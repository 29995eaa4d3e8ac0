//! Deterministic canned markup used when no provider answers.
//!
//! The instruction is matched against keyword lists in order; the first
//! template whose keywords appear wins. Unmatched instructions get a generic
//! section that echoes the request.

use voxel_html::serializer::escape_text;

/// Keyword lists and the template each one selects.
const TEMPLATES: &[(&[&str], &str)] = &[
    (
        &["button", "cta", "call to action"],
        r#"<div style="padding: 16px; text-align: center;"><button type="button" style="padding: 12px 24px; border: none; border-radius: 8px; background-color: #3b82f6; color: #ffffff; font-size: 16px; cursor: pointer;">Get started</button></div>"#,
    ),
    (
        &["form", "input", "sign up", "signup", "login", "log in", "subscribe", "newsletter"],
        r#"<form style="display: flex; flex-direction: column; gap: 12px; max-width: 360px; padding: 16px;"><label for="voxel-email">Email</label><input id="voxel-email" type="email" placeholder="you@example.com" style="padding: 10px; border: 1px solid #d1d5db; border-radius: 6px;"><button type="submit" style="padding: 10px; border: none; border-radius: 6px; background-color: #111827; color: #ffffff;">Submit</button></form>"#,
    ),
    (
        &["card", "tile", "pricing"],
        r#"<div style="max-width: 320px; padding: 24px; border: 1px solid #e5e7eb; border-radius: 12px; box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1);"><h3 style="margin: 0 0 8px;">Card title</h3><p style="margin: 0; color: #4b5563;">A short description of what this card is about.</p></div>"#,
    ),
    (
        &["nav", "navigation", "menu", "header"],
        r##"<nav style="display: flex; gap: 24px; align-items: center; padding: 16px 24px; background-color: #111827;"><a href="#" style="color: #ffffff; font-weight: 700; text-decoration: none;">Brand</a><a href="#" style="color: #d1d5db; text-decoration: none;">Features</a><a href="#" style="color: #d1d5db; text-decoration: none;">Pricing</a><a href="#" style="color: #d1d5db; text-decoration: none;">Contact</a></nav>"##,
    ),
    (
        &["footer"],
        r##"<footer style="padding: 24px; text-align: center; color: #6b7280; border-top: 1px solid #e5e7eb;"><p style="margin: 0;">&copy; 2024 Company. All rights reserved.</p></footer>"##,
    ),
    (
        &["hero", "banner", "headline"],
        r#"<section style="padding: 64px 24px; text-align: center; background-color: #eff6ff;"><h1 style="margin: 0 0 16px; font-size: 40px;">Build something great</h1><p style="margin: 0 0 24px; color: #4b5563;">A one-line value proposition that explains the product.</p><button type="button" style="padding: 12px 24px; border: none; border-radius: 8px; background-color: #3b82f6; color: #ffffff;">Try it free</button></section>"#,
    ),
    (
        &["table", "grid", "data"],
        r#"<table style="border-collapse: collapse; width: 100%;"><thead><tr><th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;">Name</th><th style="padding: 8px; border-bottom: 2px solid #e5e7eb; text-align: left;">Status</th></tr></thead><tbody><tr><td style="padding: 8px; border-bottom: 1px solid #e5e7eb;">Item one</td><td style="padding: 8px; border-bottom: 1px solid #e5e7eb;">Active</td></tr><tr><td style="padding: 8px;">Item two</td><td style="padding: 8px;">Pending</td></tr></tbody></table>"#,
    ),
    (
        &["list", "bullet", "features"],
        r#"<ul style="padding-left: 20px; line-height: 1.6;"><li>First feature</li><li>Second feature</li><li>Third feature</li></ul>"#,
    ),
    (
        &["image", "photo", "picture", "img"],
        r#"<figure style="margin: 16px 0;"><img src="https://placehold.co/600x400" alt="Placeholder image" width="600" height="400" style="max-width: 100%; border-radius: 8px;"><figcaption style="color: #6b7280; font-size: 14px;">Image caption</figcaption></figure>"#,
    ),
];

/// Canned markup for `instruction`.
#[must_use]
pub fn fallback_markup(instruction: &str) -> String {
    let lower = instruction.to_ascii_lowercase();
    if let Some((_, template)) = TEMPLATES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
    {
        return (*template).to_string();
    }

    let mut echoed = String::new();
    escape_text(instruction.trim(), &mut echoed);
    format!(
        r#"<section style="padding: 24px; border: 1px dashed #d1d5db; border-radius: 8px;"><h2 style="margin: 0 0 8px;">New section</h2><p style="margin: 0; color: #4b5563;">{echoed}</p></section>"#
    )
}
