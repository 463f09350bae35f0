//! Static HTML pages for the two browser-navigated email-link routes.
//!
//! The verification and reset links land in a browser, not an API client, so
//! they render terminal pages instead of JSON.

pub const VERIFY_SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Account verified</title>
</head>
<body>
  <h1>Your account is verified</h1>
  <p>You can now sign in with your username and password.</p>
</body>
</html>
"#;

pub const VERIFY_FAILURE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Verification failed</title>
</head>
<body>
  <h1>Verification failed</h1>
  <p>This verification link is invalid or was already used.</p>
</body>
</html>
"#;

/// Reset form: posts the token embedded in the page together with the new
/// password to the confirm endpoint.
pub const RESET_FORM_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Choose a new password</title>
</head>
<body>
  <h1>Choose a new password</h1>
  <form id="reset-form">
    <input type="password" id="password" placeholder="New password" required>
    <button type="submit">Reset password</button>
  </form>
  <p id="result"></p>
  <script>
    document.getElementById("reset-form").addEventListener("submit", async function (event) {
      event.preventDefault();
      var token = window.location.pathname.split("/").pop();
      var response = await fetch("/reset-password-now", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({
          resetPasswordToken: token,
          password: document.getElementById("password").value
        })
      });
      var body = await response.json();
      document.getElementById("result").textContent = body.message;
    });
  </script>
</body>
</html>
"#;

pub const RESET_FAILURE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Reset link invalid</title>
</head>
<body>
  <h1>Reset link invalid</h1>
  <p>This password-reset link is invalid or has expired. Request a new one.</p>
</body>
</html>
"#;
