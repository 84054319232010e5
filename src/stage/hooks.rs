//! Maintainer script generators.
//!
//! Script text depends only on the service name, so these are plain
//! functions and can be tested without touching the filesystem.

/// The three lifecycle slots the backend recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    PostInst,
    PreRm,
    PostRm,
}

impl Hook {
    /// All hooks, in the order they are written to the metadata directory.
    pub const ALL: [Hook; 3] = [Hook::PostInst, Hook::PreRm, Hook::PostRm];

    /// File name inside `DEBIAN/`.
    pub fn file_name(self) -> &'static str {
        match self {
            Hook::PostInst => "postinst",
            Hook::PreRm => "prerm",
            Hook::PostRm => "postrm",
        }
    }

    /// Script body for `service`.
    pub fn render(self, service: &str) -> String {
        match self {
            Hook::PostInst => postinst(service),
            Hook::PreRm => prerm(service),
            Hook::PostRm => postrm(service),
        }
    }
}

fn script(body: &[String]) -> String {
    let mut out = String::from("#!/bin/sh\nset -e\n\n");
    for line in body {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("\nexit 0\n");
    out
}

/// Reload units, then enable and start the timer.
pub fn postinst(service: &str) -> String {
    script(&[
        "systemctl daemon-reload".to_string(),
        format!("systemctl enable {service}.timer"),
        format!("systemctl start {service}.timer"),
    ])
}

/// Stop and disable the timer (tolerated if already done), then stop the service.
pub fn prerm(service: &str) -> String {
    script(&[
        format!("systemctl stop {service}.timer || true"),
        format!("systemctl disable {service}.timer || true"),
        format!("systemctl stop {service}.service"),
    ])
}

/// Reload units after the unit files are gone.
pub fn postrm(_service: &str) -> String {
    script(&["systemctl daemon-reload".to_string()])
}
