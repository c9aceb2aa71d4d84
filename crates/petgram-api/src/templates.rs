//! Fixed HTML pages for the email-driven flows, plus the two mail bodies.

/// Result page for the account-activation link. With an error it renders
/// the failure variant; otherwise it confirms the verified email.
pub fn verification_page(email: &str, error: Option<&str>) -> String {
    let (class, title, body) = match error {
        Some(err) => ("failure", "An Error Ocurred", err.to_string()),
        None => (
            "success",
            "Email Verified",
            format!(
                "Your email <strong>{email}</strong> has been successfully verified, \
                 now you can login with your account"
            ),
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <title>Email Verification</title>
    <style type="text/css" media="all">
      body {{
        padding: 25px;
        display: flex;
        flex-direction: column;
        align-items: center;
      }}
      .title {{
        color: #5c6ac4;
      }}
      .success {{
        color: green;
      }}
      .failure {{
        color: red;
      }}
    </style>
  </head>
  <body>
    <h1 class="{class}">{title}</h1>
    <p>{body}</p>
  </body>
</html>
"#
    )
}

/// Password-reset form. The token travels in the form action so the POST
/// lands back on the same endpoint.
pub fn reset_form_page(token: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <title>Reset Password</title>
    <style type="text/css" media="all">
      body {{
        padding: 25px;
        display: flex;
        flex-direction: column;
        align-items: center;
      }}
      form {{
        display: flex;
        flex-direction: column;
        gap: 12px;
      }}
      .form-item {{
        display: flex;
        flex-direction: column;
        gap: 2px;
      }}
    </style>
  </head>
  <body>
    <h1>Reset Your Password</h1>
    <form action="/auth/reset-password?xt={token}" method="post">
      <div class="form-item">
        <label for="new-password">Enter new password: </label>
        <input id="new-password" type="password" name="new_password" value="" />
      </div>
      <div class="form-item">
        <label for="confirm-password">Confirm new password: </label>
        <input id="confirm-password" type="password" name="confirm_password" value="" />
      </div>
      <input type="submit" value="Submit" />
    </form>
  </body>
</html>
"#
    )
}

pub fn reset_success_page() -> String {
    r#"<!DOCTYPE html>
<html>
  <head>
    <title>Password Reset</title>
    <style type="text/css" media="all">
      body {
        padding: 25px;
        display: flex;
        flex-direction: column;
        align-items: center;
      }
    </style>
  </head>
  <body>
    <h1>Password Successfully Reset!</h1>
    <p>Your password has been successfully updated</p>
  </body>
</html>
"#
    .to_string()
}

pub fn activation_email_body(name: &str, link: &str) -> String {
    format!(
        r#"<h1>Activate your account</h1>
    <p>
      Hi {name}, Your registration is almost finished, just click on this button to
      activate your account
    </p>
    <a href="{link}"><button>Activate</button></a>"#
    )
}

pub fn reset_email_body(name: &str, link: &str) -> String {
    format!(
        r#"<h1>Reset Password</h1>
    <p>
      Hi {name}, you have forgotten your password. Don't worry, just click on
      this button
    </p>
    <a href="{link}"><button>Reset Password</button></a>"#
    )
}
