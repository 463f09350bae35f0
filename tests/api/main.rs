mod support;

mod lifecycle;
mod login;
mod password_reset;
mod registration;
