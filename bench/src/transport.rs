use crate::images::ImageFile;
use reqwest::Client as HttpClient;
use reqwest::multipart::{Form, Part};
use shared::{FieldValue, HttpReply, Payload, Submission, Transport, TransportError};
use std::future::Future;

/// Multipart POST through reqwest.
#[derive(Default)]
pub struct ReqwestTransport {
    client: HttpClient,
}

impl Transport<ImageFile> for ReqwestTransport {
    fn post(
        &self,
        submission: &Submission<ImageFile>,
    ) -> impl Future<Output = Result<HttpReply, TransportError>> {
        let form = build_form(&submission.payload);
        let mut request = self.client.post(submission.url.clone());
        if let Some(token) = &submission.bearer_token {
            request = request.bearer_auth(token);
        }
        let request_id = submission.request_id;

        async move {
            let response = request
                .multipart(form?)
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Decode(e.to_string()))?;
            log::debug!("request {} answered with {}", request_id, status);
            Ok(HttpReply { status, body })
        }
    }
}

fn build_form(payload: &Payload<ImageFile>) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for field in &payload.fields {
        form = match &field.value {
            FieldValue::Text(value) => form.text(field.name, value.clone()),
            FieldValue::File(image) => {
                let part = Part::bytes(image.bytes.clone())
                    .file_name(image.name.clone())
                    .mime_str(image.mime())
                    .map_err(|e| TransportError::Network(e.to_string()))?;
                form.part(field.name, part)
            }
        };
    }
    Ok(form)
}
