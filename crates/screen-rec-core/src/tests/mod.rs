mod capture;
mod session;
mod support;
