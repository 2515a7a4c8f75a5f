//! The remote provisioning batch.
//!
//! Targets Debian/Ubuntu hosts with `apt-get` and systemd. Every install is
//! guarded by an existence check so the batch can be re-run on a prepared host.

use crate::domain::script::{RemoteScript, Step, shell_quote};

/// Standalone compose release installed when `docker-compose` is absent.
pub const COMPOSE_RELEASE: &str = "v2.29.7";

const APT: &str = "sudo DEBIAN_FRONTEND=noninteractive apt-get";

/// Builds the provisioning batch for `user`.
#[must_use]
pub fn provisioning_script(user: &str) -> RemoteScript {
    let user = shell_quote(user);
    RemoteScript::new("shipyard: prepare remote environment")
        .step(Step::new("Refreshing package index").run(format!("{APT} update -y")))
        .step(Step::new("Upgrading packages").run(format!("{APT} upgrade -y")))
        .step(
            Step::new("Installing Docker engine and compose plugin")
                .unless("command -v docker")
                .run(format!("{APT} install -y ca-certificates curl gnupg"))
                .run("sudo install -m 0755 -d /etc/apt/keyrings")
                .run(
                    "curl -fsSL https://download.docker.com/linux/$(. /etc/os-release && echo \"$ID\")/gpg \
                     | sudo gpg --dearmor --yes -o /etc/apt/keyrings/docker.gpg",
                )
                .run("sudo chmod a+r /etc/apt/keyrings/docker.gpg")
                .run(
                    "echo \"deb [arch=$(dpkg --print-architecture) signed-by=/etc/apt/keyrings/docker.gpg] \
                     https://download.docker.com/linux/$(. /etc/os-release && echo \"$ID\") \
                     $(. /etc/os-release && echo \"$VERSION_CODENAME\") stable\" \
                     | sudo tee /etc/apt/sources.list.d/docker.list >/dev/null",
                )
                .run(format!("{APT} update -y"))
                .run(format!(
                    "{APT} install -y docker-ce docker-ce-cli containerd.io docker-buildx-plugin docker-compose-plugin"
                )),
        )
        .step(
            Step::new("Installing standalone docker-compose")
                .unless("command -v docker-compose")
                .run(format!(
                    "sudo curl -fsSL \"https://github.com/docker/compose/releases/download/{COMPOSE_RELEASE}/docker-compose-$(uname -s)-$(uname -m)\" \
                     -o /usr/local/bin/docker-compose"
                ))
                .run("sudo chmod +x /usr/local/bin/docker-compose"),
        )
        .step(
            Step::new("Installing nginx")
                .unless("command -v nginx")
                .run(format!("{APT} install -y nginx")),
        )
        .step(
            Step::new("Adding user to docker group")
                .unless(format!("id -nG {user} | grep -qw docker"))
                .run(format!("sudo usermod -aG docker {user}")),
        )
        .step(
            Step::new("Enabling services")
                .run("sudo systemctl enable --now docker")
                .run("sudo systemctl enable --now nginx"),
        )
        .step(
            Step::new("Installed versions")
                .run("docker --version")
                .run("docker compose version")
                .run("docker-compose --version")
                .run("nginx -v")
                .tolerate_failure(),
        )
}
