//! Server-side HTML for every page.

use chrono::{Datelike, NaiveDate, Utc};
use url::form_urlencoded;

use skfiles_calendar::{CalendarWidget, DayCell, EventDraft, EventOwner, GridCell, Panel, YearMonth};

use crate::{
    contact::{ContactForm, FormStatus},
    content::{category_slug, ContentProvider, Post, SiteMeta},
};

pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Percent-encodes an id for use as a query value or a path segment.
/// The output needs no further HTML escaping.
pub fn encode_id(id: &str) -> String {
    // A `+` left over from byte_serialize is always a space; `+` itself
    // comes out as `%2B`.
    form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn layout(site: &SiteMeta, page_title: Option<&str>, body: &str) -> String {
    let title = escape(&site.title);
    let full_title = match page_title {
        Some(page_title) => format!("{} | {title}", escape(page_title)),
        None => title.clone(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{full_title}</title>
<meta name="description" content="{tagline}">
</head>
<body>
<header class="site-header">
<nav>
<a class="brand" href="/">{title}</a>
<ul class="site-nav">
<li><a href="/">Home</a></li>
<li><a href="/blog">Blog</a></li>
<li><a href="/about">About</a></li>
<li><a href="/contact">Contact</a></li>
</ul>
</nav>
</header>
<main>
{body}
</main>
<footer class="site-footer">
<p>&copy; {year} {title}. All rights reserved.</p>
</footer>
</body>
</html>
"#,
        tagline = escape(&site.tagline),
        year = Utc::now().year(),
    )
}

fn post_card(post: &Post) -> String {
    let id = encode_id(&post.id);
    let title = escape(&post.title);

    format!(
        r#"<article class="post-card">
<img src="{image}" alt="{title}">
<div class="post-meta"><span class="post-date">{date}</span> <span>&bull;</span> <a class="post-category" href="/category/{slug}">{category}</a></div>
<h3><a href="/posts/{id}">{title}</a></h3>
<p class="post-excerpt">{excerpt}</p>
<a class="read-more" href="/posts/{id}">Read more &rarr;</a>
</article>
"#,
        image = escape(&post.image),
        date = long_date(post.date),
        slug = escape(&category_slug(&post.category)),
        category = escape(&post.category),
        excerpt = escape(&post.excerpt),
    )
}

pub fn home(content: &dyn ContentProvider, widget: &str) -> String {
    let site = content.site();
    let posts = content.posts().iter().map(post_card).collect::<String>();
    let categories = content
        .categories()
        .iter()
        .map(|category| {
            format!(
                r#"<li><a href="/category/{}">{}</a></li>"#,
                escape(&category_slug(category)),
                escape(category)
            )
        })
        .collect::<String>();

    let body = format!(
        r#"<div class="home">
<div class="home-main">
<section class="hero">
<h1>{title}</h1>
<p>{intro}</p>
</section>
<section class="latest-posts">
<h2>Latest Posts</h2>
{posts}</section>
<section class="newsletter">
<h2>Stay Updated</h2>
<p>Subscribe to my newsletter for the latest posts and insights.</p>
<form class="newsletter-form" method="get" action="/">
<input type="email" placeholder="Enter your email" required>
<button type="submit">Subscribe</button>
</form>
</section>
</div>
<aside class="sidebar">
<div class="widget calendar-widget">
<h3>Calendar</h3>
{widget}
</div>
<div class="widget categories">
<h3>Categories</h3>
<ul>{categories}</ul>
</div>
</aside>
</div>"#,
        title = escape(&site.title),
        intro = escape(&site.intro),
    );

    layout(site, None, &body)
}

pub fn post_list(site: &SiteMeta, heading: &str, posts: &[&Post]) -> String {
    let cards = if posts.is_empty() {
        r#"<p class="empty">No posts here yet.</p>"#.to_string()
    } else {
        posts.iter().map(|post| post_card(post)).collect()
    };

    let body = format!(
        r#"<section class="post-list">
<h1>{}</h1>
{cards}</section>"#,
        escape(heading)
    );

    layout(site, Some(heading), &body)
}

pub fn post(site: &SiteMeta, post: &Post) -> String {
    let paragraphs = post
        .paragraphs()
        .map(|paragraph| format!("<p>{}</p>\n", escape(paragraph)))
        .collect::<String>();

    let body = format!(
        r#"<article class="post">
<header>
<h1>{title}</h1>
<time datetime="{iso}">{date}</time>
</header>
<div class="post-content">
{paragraphs}</div>
</article>"#,
        title = escape(&post.title),
        iso = post.date,
        date = long_date(post.date),
    );

    layout(site, Some(&post.title), &body)
}

pub fn about(site: &SiteMeta) -> String {
    let paragraphs = site
        .about
        .iter()
        .map(|paragraph| format!("<p>{}</p>\n", escape(paragraph)))
        .collect::<String>();

    let body = format!(
        r#"<div class="about">
<h1>About Me</h1>
{paragraphs}<a class="back" href="/">&larr; Back to Home</a>
</div>"#
    );

    layout(site, Some("About"), &body)
}

pub fn contact(
    site: &SiteMeta,
    form: &ContactForm,
    status: FormStatus,
    notice: Option<&str>,
) -> String {
    let main = if status == FormStatus::Submitted {
        r#"<div class="form-success">
<h3>Thank you for your message!</h3>
<p>I'll get back to you as soon as possible. In the meantime, feel free to check out my latest blog posts.</p>
<a class="back" href="/">&larr; Back to Home</a>
</div>"#
            .to_string()
    } else {
        let notice = notice
            .map(|notice| format!(r#"<div class="form-notice">{}</div>"#, escape(notice)))
            .unwrap_or_default();
        let error = if status == FormStatus::Error {
            r#"<div class="form-error">There was an error sending your message. Please try again later.</div>"#
        } else {
            ""
        };

        format!(
            r#"<form class="contact-form" method="post" action="/contact">
{notice}<label for="name">Name</label>
<input type="text" id="name" name="name" value="{name}" required>
<label for="email">Email</label>
<input type="email" id="email" name="email" value="{email}" required>
<label for="subject">Subject</label>
<input type="text" id="subject" name="subject" value="{subject}" required>
<label for="message">Message</label>
<textarea id="message" name="message" rows="6" required>{message}</textarea>
<button type="submit">Send Message</button>
{error}
</form>"#,
            name = escape(&form.name),
            email = escape(&form.email),
            subject = escape(&form.subject),
            message = escape(&form.message),
        )
    };

    let social = site
        .social
        .iter()
        .map(|link| {
            format!(
                r#"<li><a href="{}" target="_blank" rel="noopener noreferrer">{}</a></li>"#,
                escape(&link.url),
                escape(&link.name)
            )
        })
        .collect::<String>();

    let body = format!(
        r#"<div class="contact">
<h1>Get in Touch</h1>
<p>Have a question, suggestion, or just want to say hello? I'd love to hear from you! Fill out the form below, and I'll get back to you as soon as possible.</p>
{main}
<section class="other-ways">
<h2>Other Ways to Connect</h2>
<ul>{social}</ul>
</section>
</div>"#
    );

    layout(site, Some("Contact"), &body)
}

pub fn not_found(site: &SiteMeta) -> String {
    let body = r#"<div class="not-found">
<h1>Page not found</h1>
<p>Nothing lives at this address, not even an unfinished folder.</p>
<a class="back" href="/">&larr; Back to Home</a>
</div>"#;

    layout(site, Some("Not found"), body)
}

fn month_link(month: YearMonth, extra: &str) -> String {
    format!("/?month={month}{extra}#calendar")
}

fn day_cell(day: &DayCell<'_>, month: YearMonth, clickable: bool) -> String {
    let class = if day.has_events() { "day has-events" } else { "day" };
    let indicator = if day.has_events() {
        format!(
            r#"<span class="indicator" title="{} event(s)"></span>"#,
            day.events.len()
        )
    } else {
        String::new()
    };

    if clickable {
        format!(
            r#"<a class="{class}" data-date="{date}" href="{href}">{number}{indicator}</a>"#,
            date = day.date,
            href = month_link(month, &format!("&amp;day={}", day.date)),
            number = day.date.day(),
        )
    } else {
        format!(
            r#"<div class="{class}" data-date="{date}">{number}{indicator}</div>"#,
            date = day.date,
            number = day.date.day(),
        )
    }
}

fn event_form(action: &str, button: &str, draft: &EventDraft, month: YearMonth, message: Option<&str>) -> String {
    let message = message
        .map(|message| format!(r#"<p class="form-error">{}</p>"#, escape(message)))
        .unwrap_or_default();

    format!(
        r#"<form class="event-form" method="post" action="{action}">
{message}<label for="title">Title</label>
<input type="text" id="title" name="title" value="{title}" required>
<label for="date">Date</label>
<input type="date" id="date" name="date" value="{date}" required>
<label for="description">Description</label>
<textarea id="description" name="description" rows="3">{description}</textarea>
<button type="submit">{button}</button>
<a class="cancel" href="{cancel}">Cancel</a>
</form>"#,
        title = escape(&draft.title),
        date = escape(&draft.date),
        description = escape(&draft.description),
        cancel = month_link(month, ""),
    )
}

fn panel<O: EventOwner>(widget: &CalendarWidget<O>, message: Option<&str>) -> String {
    let month = widget.month();

    match widget.panel() {
        Panel::Closed => format!(
            r#"<a class="add-event" href="{}">Add Event</a>"#,
            month_link(month, "&amp;add=true")
        ),
        Panel::Add(draft) => event_form("/calendar/events", "Add Event", draft, month, message),
        Panel::Edit { id, draft } => event_form(
            &format!("/calendar/events/{}", encode_id(id.as_str())),
            "Save Changes",
            draft,
            month,
            message,
        ),
        Panel::ConfirmDelete(id) => {
            let title = widget.event(id).map(|event| event.title.as_str()).unwrap_or_default();
            format!(
                r#"<form class="confirm-delete" method="post" action="/calendar/events/{id}/delete">
<p>Delete &quot;{title}&quot;?</p>
<input type="hidden" name="confirm" value="yes">
<button type="submit">Delete</button>
<a class="cancel" href="{cancel}">Cancel</a>
</form>"#,
                id = encode_id(id.as_str()),
                title = escape(title),
                cancel = month_link(month, ""),
            )
        }
    }
}

/// The month grid, this month's events and whichever form is open.
pub fn calendar_widget<O: EventOwner>(widget: &CalendarWidget<O>, message: Option<&str>) -> String {
    let month = widget.month();
    let clickable = widget.accepts_day_clicks();

    let weekdays = widget
        .weekdays()
        .map(|weekday| format!(r#"<div class="weekday">{weekday}</div>"#))
        .collect::<String>();

    let cells = widget
        .grid()
        .map(|cell| match cell {
            GridCell::Blank => r#"<div class="day blank"></div>"#.to_string(),
            GridCell::Day(day) => day_cell(&day, month, clickable),
        })
        .collect::<String>();

    let events = widget
        .events()
        .iter()
        .filter(|event| month.contains(event.date))
        .map(|event| {
            let id = encode_id(event.id().as_str());
            let description = event
                .description
                .as_deref()
                .map(|description| format!(r#"<p class="event-description">{}</p>"#, escape(description)))
                .unwrap_or_default();

            format!(
                r#"<li class="event" data-id="{data_id}"><span class="event-date">{date}</span> <span class="event-title">{title}</span>{description} <a class="edit" href="{edit}">Edit</a> <a class="delete" href="{delete}">Delete</a></li>"#,
                data_id = escape(event.id().as_str()),
                date = event.date.format("%b %-d"),
                title = escape(&event.title),
                edit = month_link(month, &format!("&amp;edit={id}")),
                delete = month_link(month, &format!("&amp;delete={id}")),
            )
        })
        .collect::<String>();

    format!(
        r#"<div class="calendar" id="calendar" data-month="{month}">
<div class="calendar-nav">
<a class="prev" href="{prev}">&larr;</a>
<h4 class="calendar-month">{label}</h4>
<a class="next" href="{next}">&rarr;</a>
</div>
<div class="calendar-grid">
{weekdays}
{cells}
</div>
<ul class="calendar-events">{events}</ul>
{panel}
</div>"#,
        prev = month_link(month.pred(), ""),
        next = month_link(month.succ(), ""),
        label = month.label(),
        panel = panel(widget, message),
    )
}
