use crate::controller::{DAILY_FAILURE, DAILY_INVALID, MONTHLY_FAILURE, MONTHLY_INVALID};
use crate::models::{GateConfig, PageState, SearchView};
use crate::table::{SKELETON_ROWS, render_skeleton_table};

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

// Single pass over `template`; substituted text is never rescanned, so fetched
// values containing `{{...}}` come out verbatim.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let found = after.find("}}").and_then(|end| {
            values
                .iter()
                .find(|(key, _)| *key == &after[..end])
                .map(|(_, value)| (end, *value))
        });
        match found {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn layout(title: &str, body: &str) -> String {
    fill(
        LAYOUT_HTML,
        &[("TITLE", title), ("STYLE", BASE_STYLE), ("BODY", body)],
    )
}

pub fn render_landing(gate: &GateConfig) -> String {
    let monthly_class = if gate.habilitado {
        "report-btn"
    } else {
        "report-btn disabled-state"
    };
    layout(
        "Portal de Asistencia",
        &fill(LANDING_BODY, &[("MONTHLY_CLASS", monthly_class)]),
    )
}

pub fn render_daily_page(dni: &str, view: &SearchView) -> String {
    let name = match &view.name {
        Some(name) => format!("👤 {}", html_escape(name)),
        None => String::new(),
    };
    let body = fill(
        DAILY_BODY,
        &[
            ("SEARCH_SCRIPT", SEARCH_SCRIPT),
            ("SKELETON", render_skeleton_table(SKELETON_ROWS).as_str()),
            ("INVALID_MESSAGE", js_string(DAILY_INVALID).as_str()),
            ("FAILURE_MESSAGE", js_string(DAILY_FAILURE).as_str()),
            ("MESSAGE_CLASS", view.message_kind.css_class()),
            ("RESULTS_CLASS", results_class(view)),
            ("DNI", html_escape(dni).as_str()),
            ("MESSAGE", html_escape(&view.message).as_str()),
            ("NAME", name.as_str()),
            ("RESULTS", view.html.as_str()),
        ],
    );
    layout("Reporte de Marcación", &body)
}

pub fn render_monthly_page(dni: &str, view: &SearchView) -> String {
    let name = view.name.as_deref().map(html_escape).unwrap_or_default();
    let (validated, no_show, should_show) = match &view.stats {
        Some(stats) => (
            html_escape(&stats.validated),
            html_escape(&stats.no_show),
            html_escape(&stats.should_show),
        ),
        None => ("–".to_string(), "–".to_string(), "–".to_string()),
    };
    let body = fill(
        MONTHLY_BODY,
        &[
            ("SEARCH_SCRIPT", SEARCH_SCRIPT),
            ("INVALID_MESSAGE", js_string(MONTHLY_INVALID).as_str()),
            ("FAILURE_MESSAGE", js_string(MONTHLY_FAILURE).as_str()),
            ("MESSAGE_CLASS", view.message_kind.css_class()),
            ("RESULTS_CLASS", results_class(view)),
            ("NAME_CLASS", if name.is_empty() { "" } else { "visible" }),
            ("DNI", html_escape(dni).as_str()),
            ("MESSAGE", html_escape(&view.message).as_str()),
            ("STAT_VALIDATED", validated.as_str()),
            ("STAT_NO_SHOW", no_show.as_str()),
            ("STAT_SHOULD_SHOW", should_show.as_str()),
            ("NAME", name.as_str()),
            ("RESULTS", view.html.as_str()),
        ],
    );
    layout("Reporte Mensual de Asistencia", &body)
}

fn results_class(view: &SearchView) -> &'static str {
    if view.state == PageState::Success {
        "results revealed"
    } else {
        "results"
    }
}

const LAYOUT_HTML: &str = r##"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>{{STYLE}}</style>
</head>
<body>
{{BODY}}
  <script>
    function redirectWithFade(url) {
      document.body.classList.add('fade-out');
      setTimeout(() => { window.location.href = url; }, 500);
    }
    document.querySelectorAll('[data-back]').forEach((btn) => {
      btn.addEventListener('click', () => redirectWithFade('/'));
    });
    document.querySelectorAll('[data-close-modal]').forEach((btn) => {
      btn.addEventListener('click', () => btn.closest('.modal').classList.remove('show'));
    });
  </script>
</body>
</html>
"##;

const BASE_STYLE: &str = r##"
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef3f8;
      --bg-2: #b9d3ea;
      --ink: #1f2a36;
      --accent: #1f6fb2;
      --accent-2: #2f4858;
      --danger: #c63b2b;
      --ok: #2d7a4b;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #dde9f5 60%, #f4f7fb 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
      transition: opacity 0.5s ease;
    }

    body.fade-out {
      opacity: 0;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
      animation: rise 600ms ease;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.8rem, 4vw, 2.5rem);
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
    }

    .search-form {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
    }

    .search-form input {
      flex: 1 1 220px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      border-radius: 999px;
      padding: 14px 20px;
      font-size: 1rem;
      letter-spacing: 0.2em;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 14px 22px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
      transition: transform 150ms ease, box-shadow 150ms ease;
    }

    button:active {
      transform: scale(0.98);
    }

    button.secondary {
      background: var(--accent-2);
    }

    .message {
      min-height: 1.2em;
      color: #6b645d;
    }

    .message.error {
      color: var(--danger);
    }

    .message.success {
      color: var(--ok);
    }

    .report-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
      gap: 18px;
      perspective: 800px;
    }

    .report-btn {
      padding: 36px 24px;
      border-radius: 22px;
      font-size: 1.2rem;
      box-shadow: 0 10px 24px rgba(31, 111, 178, 0.3);
    }

    .report-btn.disabled-state {
      background: #9aa7b3;
      box-shadow: none;
      cursor: not-allowed;
    }

    .overlay {
      position: fixed;
      inset: 0;
      display: none;
      place-items: center;
      background: rgba(255, 255, 255, 0.6);
      z-index: 10;
    }

    .overlay.active {
      display: grid;
    }

    .spinner {
      width: 48px;
      height: 48px;
      border-radius: 50%;
      border: 4px solid rgba(31, 111, 178, 0.2);
      border-top-color: var(--accent);
      animation: spin 900ms linear infinite;
    }

    .modal {
      position: fixed;
      inset: 0;
      display: none;
      place-items: center;
      background: rgba(31, 42, 54, 0.45);
      z-index: 20;
    }

    .modal.show {
      display: grid;
    }

    .modal-card {
      background: white;
      border-radius: 20px;
      padding: 28px;
      max-width: 420px;
      display: grid;
      gap: 16px;
    }

    .results {
      opacity: 0;
      transform: translateY(12px);
      transition: opacity 400ms ease, transform 400ms ease;
    }

    .results.revealed {
      opacity: 1;
      transform: translateY(0);
    }

    .result-table {
      width: 100%;
      border-collapse: collapse;
      background: white;
      border-radius: 16px;
      overflow: hidden;
    }

    .result-table th,
    .result-table td {
      padding: 10px 12px;
      text-align: left;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
    }

    .result-table th {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #8b857d;
    }

    .skeleton-row td,
    .day.skeleton {
      background: linear-gradient(90deg, #eef1f4 25%, #f8fafb 50%, #eef1f4 75%);
      background-size: 200% 100%;
      animation: shimmer 1.2s infinite;
      height: 36px;
    }

    .employee-name {
      font-size: 1.2rem;
      font-weight: 600;
      min-height: 1.4em;
    }

    .employee-name.typed {
      overflow: hidden;
      white-space: nowrap;
      animation: typing 1.2s steps(30, end);
    }

    .full-name {
      opacity: 0;
      transition: opacity 400ms ease;
    }

    .full-name.visible {
      opacity: 1;
    }

    .calendar-container {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
      gap: 18px;
    }

    .month-calendar h2 {
      margin: 0 0 8px;
      font-size: 1.2rem;
    }

    .weekday-header,
    .days-grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 4px;
      text-align: center;
    }

    .weekday-header div {
      font-size: 0.75rem;
      color: #8b857d;
    }

    .day {
      border-radius: 10px;
      background: white;
      padding: 4px;
      display: grid;
      font-size: 0.8rem;
      opacity: 0;
      transition: opacity 300ms ease;
      transition-delay: calc(var(--reveal, 0) * 20ms);
    }

    .revealed .day,
    .day.skeleton {
      opacity: 1;
    }

    .day .value {
      font-weight: 600;
    }

    .day.val-A { background: #d8f1e0; }
    .day.val-F { background: #f8d7d3; }
    .day.val-T { background: #fdf0c8; }
    .day.val-NA { background: #e3e7eb; }
    .day.val-MI { background: #e6dcf7; }

    .stats-panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 16px;
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    @keyframes rise {
      from { opacity: 0; transform: translateY(18px); }
      to { opacity: 1; transform: translateY(0); }
    }

    @keyframes spin {
      to { transform: rotate(360deg); }
    }

    @keyframes shimmer {
      from { background-position: 200% 0; }
      to { background-position: -200% 0; }
    }

    @keyframes typing {
      from { max-width: 0; }
      to { max-width: 100%; }
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
      button {
        width: 100%;
      }
    }
"##;

const LANDING_BODY: &str = r##"
  <main class="app">
    <header>
      <h1>Portal de Asistencia</h1>
      <p class="subtitle">Consulte sus marcaciones diarias o su reporte mensual.</p>
    </header>
    <section class="report-grid">
      <button class="report-btn" id="reporte-marcacion" type="button">Reporte de Marcación</button>
      <button class="{{MONTHLY_CLASS}}" id="reporte-mensual" type="button">Reporte Mensual</button>
    </section>
  </main>

  <div class="modal" id="infoModal">
    <div class="modal-card">
      <h2>Reporte no disponible</h2>
      <p>El reporte mensual se encuentra en actualización. Vuelva a intentarlo más tarde.</p>
      <button type="button" data-close-modal>Entendido</button>
    </div>
  </div>

  <script>
    document.addEventListener('DOMContentLoaded', () => {
      const btnMarcacion = document.getElementById('reporte-marcacion');
      const btnMensual = document.getElementById('reporte-mensual');
      const infoModal = document.getElementById('infoModal');

      btnMarcacion.addEventListener('click', () => redirectWithFade('/marcacion'));
      btnMensual.addEventListener('click', () => {
        if (btnMensual.classList.contains('disabled-state')) {
          infoModal.classList.add('show');
        } else {
          redirectWithFade('/asistencia');
        }
      });

      document.querySelectorAll('.report-btn').forEach((btn) => {
        btn.addEventListener('mousemove', (e) => {
          if (btn.classList.contains('disabled-state')) {
            btn.style.transform = '';
            return;
          }
          const rect = btn.getBoundingClientRect();
          const dx = (e.clientX - rect.left - rect.width / 2) / (rect.width / 2);
          const dy = (e.clientY - rect.top - rect.height / 2) / (rect.height / 2);
          btn.style.transform = `rotateY(${dx * 10}deg) rotateX(${-dy * 10}deg) scale(1.05)`;
        });
        btn.addEventListener('mouseleave', () => {
          btn.style.transform = '';
        });
      });
    });
  </script>
"##;

const SEARCH_SCRIPT: &str = r##"
    const form = document.getElementById('searchForm');
    const input = document.getElementById('dniInput');
    const msg = document.getElementById('message');
    const overlay = document.getElementById('overlay');
    const results = document.getElementById('results');
    let latestRequest = 0;

    input.addEventListener('input', () => {
      input.value = input.value.replace(/[^0-9]/g, '');
    });

    function showMessage(text, type) {
      msg.textContent = text;
      msg.className = `message ${type || ''}`;
    }

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      const dni = input.value.trim();
      if (!/^[0-9]{8}$/.test(dni)) {
        showMessage(INVALID_MESSAGE, 'error');
        return;
      }

      const ticket = ++latestRequest;
      resetView();
      showMessage('');
      overlay.classList.add('active');
      try {
        const res = await fetch(`${SEARCH_ENDPOINT}?dni=${encodeURIComponent(dni)}`, { cache: 'no-store' });
        const view = await res.json();
        if (ticket !== latestRequest) {
          return;
        }
        showMessage(view.message, view.message_kind === 'none' ? '' : view.message_kind);
        applyView(view);
      } catch (err) {
        if (ticket !== latestRequest) {
          return;
        }
        results.innerHTML = '';
        showMessage(FAILURE_MESSAGE, 'error');
        console.error(err);
      } finally {
        if (ticket === latestRequest) {
          overlay.classList.remove('active');
        }
      }
    });
"##;

const DAILY_BODY: &str = r##"
  <main class="app">
    <header>
      <h1>Reporte de Marcación</h1>
      <p class="subtitle">Ingrese su DNI para ver sus marcaciones diarias.</p>
    </header>
    <form class="search-form" id="searchForm" method="get" action="/marcacion">
      <input id="dniInput" name="dni" type="text" inputmode="numeric" maxlength="8" autocomplete="off" placeholder="DNI" value="{{DNI}}" />
      <button type="submit">Buscar</button>
      <button class="secondary" type="button" id="btn-regresar" data-back>Regresar</button>
    </form>
    <div class="message {{MESSAGE_CLASS}}" id="message">{{MESSAGE}}</div>
    <div class="employee-name" id="nombreEmpleado">{{NAME}}</div>
    <div class="{{RESULTS_CLASS}}" id="results">{{RESULTS}}</div>
  </main>

  <div class="overlay" id="overlay"><div class="spinner"></div></div>

  <div class="modal show" id="updateInfoModal">
    <div class="modal-card">
      <h2>Aviso</h2>
      <p>Las marcaciones se actualizan periódicamente; los registros del día pueden tardar en aparecer.</p>
      <button type="button" data-close-modal>Cerrar</button>
    </div>
  </div>

  <template id="skeleton">{{SKELETON}}</template>

  <script>
    const SEARCH_ENDPOINT = '/api/marcacion';
    const INVALID_MESSAGE = {{INVALID_MESSAGE}};
    const FAILURE_MESSAGE = {{FAILURE_MESSAGE}};
    const nameEl = document.getElementById('nombreEmpleado');
    const skeleton = document.getElementById('skeleton').innerHTML;

    function resetView() {
      nameEl.textContent = '';
      results.classList.remove('revealed');
      results.innerHTML = skeleton;
      results.classList.add('revealed');
    }

    function applyView(view) {
      results.classList.remove('revealed');
      results.innerHTML = view.html;
      if (view.name) {
        nameEl.textContent = `👤 ${view.name}`;
        nameEl.classList.remove('typed');
        void nameEl.offsetWidth;
        nameEl.classList.add('typed');
      }
      setTimeout(() => results.classList.add('revealed'), 50);
    }
{{SEARCH_SCRIPT}}
  </script>
"##;

const MONTHLY_BODY: &str = r##"
  <main class="app">
    <header>
      <h1>Reporte Mensual de Asistencia</h1>
      <p class="subtitle">Período del 22 al 21 del mes siguiente.</p>
    </header>
    <form class="search-form" id="searchForm" method="get" action="/asistencia">
      <input id="dniInput" name="dni" type="text" inputmode="numeric" maxlength="8" autocomplete="off" placeholder="DNI" value="{{DNI}}" />
      <button type="submit">Buscar</button>
      <button class="secondary" type="button" id="btn-regresar" data-back>Regresar</button>
    </form>
    <div class="message {{MESSAGE_CLASS}}" id="message">{{MESSAGE}}</div>
    <div class="employee-name full-name {{NAME_CLASS}}" id="fullName">{{NAME}}</div>
    <section class="calendar-container">
      <div class="{{RESULTS_CLASS}}" id="results">{{RESULTS}}</div>
      <div class="stats-panel">
        <div class="stat">
          <span class="label">Asistencia validada</span>
          <span class="value" id="stat-validated">{{STAT_VALIDATED}}</span>
        </div>
        <div class="stat">
          <span class="label">No marcó</span>
          <span class="value" id="stat-no-show">{{STAT_NO_SHOW}}</span>
        </div>
        <div class="stat">
          <span class="label">Debió marcar</span>
          <span class="value" id="stat-should-show">{{STAT_SHOULD_SHOW}}</span>
        </div>
      </div>
    </section>
  </main>

  <div class="overlay" id="overlay"><div class="spinner"></div></div>

  <div class="modal show" id="updateInfoModal">
    <div class="modal-card">
      <h2>Aviso</h2>
      <p>El reporte mensual corresponde al período vigente y se actualiza al cierre de cada semana.</p>
      <button type="button" data-close-modal>Cerrar</button>
    </div>
  </div>

  <script>
    const SEARCH_ENDPOINT = '/api/asistencia';
    const INVALID_MESSAGE = {{INVALID_MESSAGE}};
    const FAILURE_MESSAGE = {{FAILURE_MESSAGE}};
    const fullNameEl = document.getElementById('fullName');
    const statValidated = document.getElementById('stat-validated');
    const statNoShow = document.getElementById('stat-no-show');
    const statShould = document.getElementById('stat-should-show');

    function resetView() {
      results.classList.remove('revealed');
      results.innerHTML = '';
      fullNameEl.textContent = '';
      fullNameEl.classList.remove('visible');
      statValidated.textContent = '–';
      statNoShow.textContent = '–';
      statShould.textContent = '–';
    }

    function applyView(view) {
      results.innerHTML = view.html;
      if (view.name) {
        fullNameEl.textContent = view.name;
        fullNameEl.classList.add('visible');
      }
      if (view.stats) {
        statValidated.textContent = view.stats.validated;
        statNoShow.textContent = view.stats.no_show;
        statShould.textContent = view.stats.should_show;
      }
      setTimeout(() => results.classList.add('revealed'), 50);
    }
{{SEARCH_SCRIPT}}
  </script>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageKind, MonthlyStats};

    #[test]
    fn landing_marks_monthly_button_when_gated() {
        let open = render_landing(&GateConfig { habilitado: true });
        assert!(!open.contains("report-btn disabled-state"));
        let closed = render_landing(&GateConfig { habilitado: false });
        assert!(closed.contains("class=\"report-btn disabled-state\" id=\"reporte-mensual\""));
    }

    #[test]
    fn daily_page_embeds_view_and_script() {
        let view = SearchView {
            name: Some("<Ana>".to_string()),
            html: "<table class=\"result-table\"></table>".to_string(),
            ..SearchView::message_only(PageState::Success, "", MessageKind::None)
        };
        let page = render_daily_page("12345678", &view);
        assert!(page.contains("value=\"12345678\""));
        assert!(page.contains("&lt;Ana&gt;"));
        assert!(page.contains("results revealed"));
        assert!(page.contains("latestRequest"));
        assert!(page.contains("\"Ingrese un DNI válido (8 dígitos).\""));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn fetched_text_is_not_expanded_as_a_placeholder() {
        let view = SearchView {
            name: Some("{{RESULTS}}".to_string()),
            stats: Some(MonthlyStats {
                validated: "{{NAME}}".to_string(),
                no_show: "0".to_string(),
                should_show: "0".to_string(),
            }),
            html: "<div class=\"month-calendar\"></div>".to_string(),
            ..SearchView::message_only(PageState::Success, "ok", MessageKind::Success)
        };
        let page = render_monthly_page("12345678", &view);
        assert_eq!(page.matches("class=\"month-calendar\"").count(), 1);
        assert!(page.contains("id=\"fullName\">{{RESULTS}}</div>"));
        assert!(page.contains("id=\"stat-validated\">{{NAME}}</span>"));

        let daily = render_daily_page("12345678", &SearchView {
            name: Some("{{RESULTS}}".to_string()),
            html: "<table class=\"result-table\"></table>".to_string(),
            ..SearchView::message_only(PageState::Success, "", MessageKind::None)
        });
        assert_eq!(daily.matches("<table class=\"result-table\">").count(), 1);
    }

    #[test]
    fn monthly_reveal_waits_for_layout() {
        let page = render_monthly_page("", &SearchView::idle());
        assert!(page.contains("setTimeout(() => results.classList.add('revealed'), 50)"));
        assert!(!page.contains("requestAnimationFrame(() => results.classList.add('revealed'))"));
    }

    #[test]
    fn monthly_page_shows_stats_or_dashes() {
        let empty = render_monthly_page("", &SearchView::idle());
        assert_eq!(empty.matches(">–</span>").count(), 3);

        let view = SearchView {
            stats: Some(MonthlyStats {
                validated: "18".to_string(),
                no_show: "2".to_string(),
                should_show: "20".to_string(),
            }),
            ..SearchView::message_only(PageState::Success, "ok", MessageKind::Success)
        };
        let page = render_monthly_page("12345678", &view);
        assert!(page.contains("id=\"stat-should-show\">20</span>"));
        assert!(page.contains("class=\"message success\""));
        assert!(!page.contains("{{"));
    }
}
