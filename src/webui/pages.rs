//! HTML pages for the web interface
//!
//! Simple inline HTML templates without a template engine. Every
//! user-controlled value is passed through `html_escape` before it is
//! interpolated into markup.

use crate::models::User;

/// Common CSS styles for all pages
const COMMON_STYLES: &str = r#"
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
        max-width: 640px;
        margin: 40px auto;
        padding: 0 20px;
        color: #333;
    }
    h1 {
        border-bottom: 2px solid #0066cc;
        padding-bottom: 10px;
    }
    form {
        margin: 20px 0;
    }
    label {
        display: block;
        font-weight: bold;
        margin: 12px 0 4px;
    }
    input[type="text"],
    input[type="password"] {
        width: 100%;
        padding: 8px;
        border: 1px solid #ddd;
        border-radius: 4px;
        box-sizing: border-box;
    }
    button {
        margin-top: 16px;
        background: #0066cc;
        color: white;
        padding: 8px 18px;
        border: none;
        border-radius: 4px;
        cursor: pointer;
    }
    ul {
        padding-left: 20px;
    }
    .pager {
        margin-top: 20px;
    }
    .pager a {
        margin-left: 10px;
    }
"#;

/// Render the registration form
pub fn register_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>userbase - Register</title>
    <style>{COMMON_STYLES}</style>
</head>
<body>
    <h1>Register</h1>
    <form action="/register" method="post">
        <label for="username">Username:</label>
        <input type="text" id="username" name="username" required>
        <label for="password">Password:</label>
        <input type="password" id="password" name="password" required>
        <button type="submit">Register</button>
    </form>
</body>
</html>"#
    )
}

/// Render the login form
pub fn login_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>userbase - Login</title>
    <style>{COMMON_STYLES}</style>
</head>
<body>
    <h1>Login</h1>
    <form action="/login" method="post">
        <label for="username">Username:</label>
        <input type="text" id="username" name="username" required>
        <label for="password">Password:</label>
        <input type="password" id="password" name="password" required>
        <button type="submit">Login</button>
    </form>
</body>
</html>"#
    )
}

/// Render the pre-filled edit form for a user
pub fn edit_page(user: &User) -> String {
    let name = html_escape(user.name.as_deref().unwrap_or(""));
    let username = html_escape(&user.username);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>userbase - Edit User</title>
    <style>{COMMON_STYLES}</style>
</head>
<body>
    <h1>Edit User</h1>
    <form action="/edit/{id}" method="post">
        <label for="name">Name:</label>
        <input type="text" id="name" name="name" value="{name}" required>
        <label for="username">Username:</label>
        <input type="text" id="username" name="username" value="{username}" required>
        <button type="submit">Update</button>
    </form>
</body>
</html>"#,
        id = user.id,
    )
}

/// Render the paginated user list
pub fn users_page(users: &[User], page: u32, limit: u32, total_pages: u64) -> String {
    let rows: String = users
        .iter()
        .map(|user| {
            format!(
                "        <li>{}: {} - {}</li>\n",
                user.id,
                html_escape(&user.username),
                html_escape(user.display_name()),
            )
        })
        .collect();

    let previous = if page > 1 {
        format!(
            r#"<a href="/?page={}&amp;limit={}">Previous</a>"#,
            page - 1,
            limit
        )
    } else {
        String::new()
    };

    let next = if u64::from(page) < total_pages {
        format!(
            r#"<a href="/?page={}&amp;limit={}">Next</a>"#,
            page + 1,
            limit
        )
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>userbase - Users</title>
    <style>{COMMON_STYLES}</style>
</head>
<body>
    <h1>User List</h1>
    <ul>
{rows}    </ul>
    <div class="pager">
        <span>Page {page} of {total_pages}</span>
        {previous}
        {next}
    </div>
</body>
</html>"#
    )
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
