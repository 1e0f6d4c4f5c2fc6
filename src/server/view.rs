//! Server-rendered page: two upload tiles, the trigger button and the result
//! viewer for the current controller snapshot.

use crate::tryon::{ControllerSnapshot, FailureKind, Slot, Status};

pub const RESULT_FILENAME: &str = "virtual-try-on-result.png";
pub const RESULT_MIME_TYPE: &str = "image/png";

/// The only place failure kinds are turned into user-facing text.
pub fn failure_message(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::MissingInput => "인물과 의류 사진을 모두 업로드해주세요.",
        FailureKind::GenerationFailed | FailureKind::EmptyResult => {
            "이미지 생성에 실패했습니다. 잠시 후 다시 시도해주세요."
        }
    }
}

pub fn render_page(snapshot: &ControllerSnapshot) -> String {
    let mut page = String::with_capacity(8 * 1024);
    page.push_str(HEAD);
    page.push_str(r#"<body><div class="container"><header><h1>AI 가상 피팅룸</h1><p>인물 사진과 의류 사진을 업로드하여 AI가 옷을 입은 모습을 즉시 확인해보세요.</p></header><main>"#);

    page.push_str(r#"<div class="uploaders">"#);
    page.push_str(&render_uploader(
        Slot::Person,
        "인물 사진",
        "정면을 바라보는 선명한 인물 사진을 업로드하세요.",
        snapshot.person_ready,
    ));
    page.push_str(&render_uploader(
        Slot::Clothing,
        "의류 사진",
        "가상으로 입어볼 옷 사진을 업로드하세요.",
        snapshot.clothing_ready,
    ));
    page.push_str("</div>");

    page.push_str(&render_trigger(snapshot));

    if let Some(kind) = snapshot.failure {
        page.push_str(&format!(
            r#"<p class="error" role="alert">{}</p>"#,
            failure_message(kind)
        ));
    }

    page.push_str(r#"<section class="result"><h2>결과</h2>"#);
    page.push_str(&render_result(snapshot));
    page.push_str("</section></main></div>");

    if snapshot.status == Status::Success {
        page.push_str(&render_modal(snapshot.generation));
    }

    page.push_str(&format!(
        r#"<script>const INITIAL_STATUS = "{}";</script>"#,
        status_name(snapshot.status)
    ));
    page.push_str(SCRIPT);
    page.push_str("</body></html>");
    page
}

fn render_uploader(slot: Slot, title: &str, description: &str, ready: bool) -> String {
    let preview = if ready {
        format!(
            r#"<img src="/api/slots/{slot}" alt="{title}"><div class="overlay"><span>이미지 변경</span></div>"#
        )
    } else {
        r#"<div class="placeholder"><p>클릭하여 이미지 업로드</p></div>"#.to_string()
    };

    format!(
        r#"<div class="uploader"><h3>{title}</h3><p class="hint">{description}</p><label class="tile" for="{slot}-uploader"><input type="file" id="{slot}-uploader" data-slot="{slot}" accept="image/png, image/jpeg" hidden>{preview}</label></div>"#
    )
}

fn render_trigger(snapshot: &ControllerSnapshot) -> String {
    let label = if snapshot.status == Status::Loading {
        r#"<span class="spinner"></span>생성 중..."#
    } else {
        "가상 피팅 생성"
    };
    let disabled = if snapshot.trigger_enabled { "" } else { " disabled" };

    format!(r#"<button id="generate" class="trigger"{disabled}>{label}</button>"#)
}

fn render_result(snapshot: &ControllerSnapshot) -> String {
    match snapshot.status {
        Status::Loading => r#"<div class="panel"><span class="spinner large"></span><p class="strong">AI가 이미지를 생성하고 있습니다...</p><p>잠시만 기다려 주세요. 최대 1분 정도 소요될 수 있습니다.</p></div>"#.to_string(),
        Status::Success => format!(
            r##"<div class="result-image"><a href="#zoom" aria-label="결과 이미지 확대하기"><img src="/api/result?g={generation}" alt="Generated result"><div class="overlay"><span>크게 보기</span></div></a><a class="download" href="/api/result/download" download="{RESULT_FILENAME}" aria-label="결과 이미지 다운로드">&#x2B07;</a></div>"##,
            generation = snapshot.generation
        ),
        Status::Idle | Status::Error => r#"<div class="panel"><p class="strong">생성된 이미지가 여기에 표시됩니다.</p><p>사진을 업로드하고 '가상 피팅 생성' 버튼을 눌러주세요.</p></div>"#.to_string(),
    }
}

fn render_modal(generation: u64) -> String {
    format!(
        r##"<div id="zoom" class="modal" role="dialog" aria-modal="true" aria-label="확대된 이미지"><a class="backdrop" href="#"></a><div class="modal-body"><img src="/api/result?g={generation}" alt="확대된 결과 이미지"><a class="close" href="#" aria-label="닫기">&times;</a></div></div>"##
    )
}

fn status_name(status: Status) -> &'static str {
    match status {
        Status::Idle => "idle",
        Status::Loading => "loading",
        Status::Success => "success",
        Status::Error => "error",
    }
}

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="ko">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>AI 가상 피팅룸</title>
<style>
body { margin: 0; min-height: 100vh; background: #111827; color: #fff; font-family: system-ui, sans-serif; }
.container { max-width: 80rem; margin: 0 auto; padding: 2rem 1rem; }
header { text-align: center; margin-bottom: 2rem; }
main { display: flex; flex-direction: column; align-items: center; }
.uploaders { width: 100%; display: grid; grid-template-columns: repeat(auto-fit, minmax(18rem, 1fr)); gap: 2rem; margin-bottom: 2rem; }
.uploader { display: flex; flex-direction: column; align-items: center; }
.hint { color: #9ca3af; font-size: .875rem; }
.tile, .panel { position: relative; width: 100%; aspect-ratio: 1; overflow: hidden; display: flex; flex-direction: column; align-items: center; justify-content: center; background: rgba(31,41,55,.5); border: 2px dashed #4b5563; border-radius: 1rem; color: #9ca3af; }
.tile { cursor: pointer; }
.tile:hover { border-color: #a855f7; }
.tile img { width: 100%; height: 100%; object-fit: cover; }
.overlay { position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; background: rgba(0,0,0,.5); opacity: 0; transition: opacity .3s; font-weight: 600; }
.tile:hover .overlay, .result-image:hover .overlay { opacity: 1; }
.trigger { padding: 1rem 2rem; font-size: 1.125rem; font-weight: 700; color: #fff; border: 0; border-radius: .75rem; background: linear-gradient(to right, #9333ea, #4f46e5); cursor: pointer; }
.trigger:disabled { opacity: .5; cursor: not-allowed; }
.error { color: #f87171; margin-top: 1rem; text-align: center; }
.result { width: 100%; max-width: 42rem; margin-top: 3rem; }
.result h2 { text-align: center; color: #d1d5db; }
.strong { font-size: 1.125rem; font-weight: 600; }
.result-image { position: relative; border-radius: 1rem; overflow: hidden; }
.result-image img { display: block; width: 100%; height: auto; }
.download { position: absolute; top: 1rem; right: 1rem; padding: .75rem 1rem; border-radius: 9999px; background: rgba(17,24,39,.7); color: #fff; text-decoration: none; }
.download:hover { background: #9333ea; }
.spinner { display: inline-block; width: 1.25rem; height: 1.25rem; margin-right: .75rem; border: 3px solid rgba(255,255,255,.25); border-top-color: #fff; border-radius: 50%; animation: spin 1s linear infinite; vertical-align: middle; }
.spinner.large { width: 3rem; height: 3rem; margin: 0 0 1rem; border-top-color: #a855f7; }
@keyframes spin { to { transform: rotate(360deg); } }
.modal { display: none; position: fixed; inset: 0; z-index: 50; align-items: center; justify-content: center; }
.modal:target { display: flex; }
.backdrop { position: absolute; inset: 0; background: rgba(0,0,0,.8); }
.modal-body { position: relative; max-width: 90vw; max-height: 90vh; }
.modal-body img { display: block; max-width: 90vw; max-height: 90vh; border-radius: .5rem; }
.close { position: absolute; top: -1rem; right: -1rem; padding: .25rem .75rem; border-radius: 9999px; background: #1f2937; color: #fff; text-decoration: none; font-size: 1.5rem; }
</style>
</head>
"#;

const SCRIPT: &str = r#"<script>
document.querySelectorAll('input[type=file][data-slot]').forEach((input) => {
  input.addEventListener('change', () => {
    const file = input.files && input.files[0];
    if (!file) return;
    const reader = new FileReader();
    reader.onloadend = async () => {
      const res = await fetch('/api/slots/' + input.dataset.slot, {
        method: 'PUT',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ data_url: reader.result }),
      });
      if (!res.ok) {
        const body = await res.json().catch(() => ({}));
        alert(body.error || res.statusText);
      }
      location.reload();
    };
    reader.readAsDataURL(file);
  });
});

document.getElementById('generate').addEventListener('click', async (event) => {
  event.currentTarget.disabled = true;
  await fetch('/api/generate', { method: 'POST' });
  location.reload();
});

document.addEventListener('keydown', (event) => {
  if (event.key === 'Escape' && location.hash === '#zoom') location.hash = '';
});

if (INITIAL_STATUS === 'loading') {
  const poll = async () => {
    const res = await fetch('/api/state');
    const state = await res.json();
    if (state.status === 'loading') setTimeout(poll, 1500);
    else location.reload();
  };
  setTimeout(poll, 1500);
}
</script>
"#;
