//! Office 365 / Teams notification recipe

use brig_core::domain::job::Job;

/// Image that posts to an Office 365 connector webhook
pub const O365_NOTIFY_IMAGE: &str = "dgkanatsios/o365-notify:latest";

/// Job named `<name>-o365-notify` that posts `message` to `webhook`
pub fn o365_job(name: &str, message: &str, webhook: &str, image: Option<&str>) -> Job {
    Job::new(
        format!("{}-o365-notify", name),
        image.unwrap_or(O365_NOTIFY_IMAGE),
    )
    .with_env("O365_WEBHOOK", webhook)
    .with_env("O365_MESSAGE", message)
    .with_tasks(["./o365-notify"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_o365_job() {
        let job = o365_job("lib", "build failed", "https://outlook.office.com/webhook/x", None);

        assert_eq!(job.name, "lib-o365-notify");
        assert_eq!(job.image, O365_NOTIFY_IMAGE);
        assert_eq!(job.tasks, vec!["./o365-notify"]);
        assert_eq!(job.env.len(), 2);
        assert_eq!(job.env["O365_MESSAGE"], "build failed");
        assert_eq!(job.env["O365_WEBHOOK"], "https://outlook.office.com/webhook/x");
    }

    #[test]
    fn test_image_override() {
        let job = o365_job("lib", "m", "w", Some("my-o365:2"));
        assert_eq!(job.image, "my-o365:2");
    }
}
