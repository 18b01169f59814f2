/// Build the voice-response document that greets the caller and connects
/// the call audio to the media stream endpoint on `host`.
pub fn connect_stream_response(host: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
    <Say>Please wait while we connect you to the recruiter.</Say>
    <Pause length="1"/>
    <Say>The interview is starting now.</Say>
    <Connect>
        <Stream url="wss://{host}/media-stream"/>
    </Connect>
</Response>"#
    )
}
