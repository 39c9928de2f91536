pub mod controller;

pub use controller::{
    load_dataset, DashboardCommand, DashboardController, DashboardStatus, SharedController,
};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::engine::{project_chart, ChartStyle, ChartValues, RowView, Theme};
use crate::model::{FilterCriteria, SortKey};

#[derive(Clone)]
pub struct AppState {
    pub controller: SharedController,
    /// Appearance used when a request does not name one.
    pub theme: Theme,
}

/// Chart values plus the colours for the requested theme.
#[derive(Debug, Clone, Serialize)]
pub struct ChartResponse {
    pub theme: Theme,
    pub style: ChartStyle,
    #[serde(flatten)]
    pub chart: ChartValues,
}

impl ChartResponse {
    fn new(chart: ChartValues, theme: Theme) -> Self {
        ChartResponse {
            theme,
            style: theme.chart_style(),
            chart,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub key: SortKey,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub index: usize,
    #[serde(default)]
    pub theme: Option<Theme>,
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    #[serde(default)]
    pub theme: Option<Theme>,
}

type ApiError = (StatusCode, String);

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/status", get(status_handler))
        .route("/api/rows", get(rows_handler))
        .route("/api/teams", get(teams_handler))
        .route("/api/filter", post(filter_handler))
        .route("/api/sort", post(sort_handler))
        .route("/api/select", post(select_handler))
        .route("/api/chart", get(chart_handler))
        .route("/api/command", post(command_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Serve the dashboard HTML page, injecting the configured theme.
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let html = DASHBOARD_HTML.replace(
        r#"<body>"#,
        &format!(r#"<body data-theme="{}">"#, state.theme.as_str()),
    );
    Html(html)
}

/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<DashboardStatus> {
    Json(state.controller.read().await.status())
}

/// GET /api/rows
async fn rows_handler(State(state): State<Arc<AppState>>) -> Json<Vec<RowView>> {
    Json(state.controller.read().await.rows())
}

/// GET /api/teams
async fn teams_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.controller.read().await.teams())
}

/// POST /api/filter  {"team":"All","min_edge":0}
async fn filter_handler(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<FilterCriteria>,
) -> Json<Vec<RowView>> {
    let mut ctl = state.controller.write().await;
    ctl.on_filter_change(criteria);
    Json(ctl.rows())
}

/// POST /api/sort  {"key":"edge_home"}
async fn sort_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SortRequest>,
) -> Json<Vec<RowView>> {
    let mut ctl = state.controller.write().await;
    ctl.on_sort_change(req.key);
    Json(ctl.rows())
}

/// POST /api/select  {"index":0,"theme":"dark"}
async fn select_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<ChartResponse>, ApiError> {
    let mut ctl = state.controller.write().await;
    let game = ctl
        .select_game(req.index)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let chart = project_chart(game);
    Ok(Json(ChartResponse::new(chart, req.theme.unwrap_or(state.theme))))
}

/// GET /api/chart?theme=light
async fn chart_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ChartQuery>,
) -> Json<Option<ChartResponse>> {
    let theme = q.theme.unwrap_or(state.theme);
    let chart = state.controller.read().await.chart();
    Json(chart.map(|c| ChartResponse::new(c, theme)))
}

/// POST /api/command  {"type":"sort_requested","value":"edge_home"}
async fn command_handler(
    State(state): State<Arc<AppState>>,
    Json(command): Json<DashboardCommand>,
) -> Result<Json<Vec<RowView>>, ApiError> {
    let mut ctl = state.controller.write().await;
    ctl.dispatch(command)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(Json(ctl.rows()))
}

/// Embedded single-file dashboard (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Game Predictions</title>
<style>
  body[data-theme="dark"] { --bg: #0d1117; --card: #161b22; --border: #30363d; --text: #e6edf3; --muted: #8b949e; --accent: #2196f3; }
  body[data-theme="light"] { --bg: #f6f8fa; --card: #ffffff; --border: #d5d5d5; --text: #000000; --muted: #57606a; --accent: #2196f3; }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .9rem 1.2rem; border-bottom: 1px solid var(--border); font-weight: 600; }
  .filter-panel { display: flex; gap: 1rem; align-items: center; padding: .9rem 1.2rem; }
  select, input, button { background: var(--bg); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: .3rem .6rem; }
  button { cursor: pointer; }
  table { width: 100%; border-collapse: collapse; }
  th { padding: .7rem 1rem; text-align: left; font-size: .75rem; text-transform: uppercase; color: var(--muted); border-bottom: 1px solid var(--border); }
  th.sortable { cursor: pointer; }
  th.sortable:hover { color: var(--accent); }
  td { padding: .65rem 1rem; font-size: .88rem; border-bottom: 1px solid var(--border); }
  tbody tr { cursor: pointer; }
  tbody tr:hover td { background: rgba(33,150,243,.08); }
  #chart h3 { padding: 1rem 1.2rem 0; }
  #chart-container { padding: 1rem; height: 240px; }
  .empty { color: var(--muted); text-align: center; padding: 2rem; font-size: .9rem; }
</style>
</head>
<body>
<header>
  <h1>Game Predictions</h1>
  <span style="margin-left:auto;color:var(--muted);font-size:.8rem;" id="status"></span>
  <button onclick="setTheme('dark')">Dark</button>
  <button onclick="setTheme('light')">Light</button>
</header>

<main>
  <div class="panel">
    <div class="filter-panel">
      <label>Team: <select id="team-filter"><option value="All">All</option></select></label>
      <label>Min edge (abs): <input type="number" id="min-edge" value="0" min="0" step="0.5"></label>
    </div>
  </div>

  <div class="panel">
    <table>
      <thead><tr>
        <th>Match</th>
        <th class="sortable" data-key="win_prob_home">Win H%</th>
        <th class="sortable" data-key="win_prob_away">Win A%</th>
        <th class="sortable" data-key="edge_home">Edge H</th>
        <th class="sortable" data-key="edge_away">Edge A</th>
        <th class="sortable" data-key="P_spread_home_cover">Spread</th>
        <th class="sortable" data-key="P_total_over">Total</th>
      </tr></thead>
      <tbody id="rows"><tr><td colspan="7" class="empty">Loading…</td></tr></tbody>
    </table>
  </div>

  <div class="panel" id="chart">
    <div class="panel-header">Select a game to chart</div>
  </div>
</main>

<script>
const theme = () => document.body.dataset.theme;

async function post(url, body) {
  const r = await fetch(url, { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(body) });
  if (!r.ok) { console.error(url, await r.text()); return null; }
  return r.json();
}

function renderRows(rows) {
  const tbody = document.getElementById('rows');
  if (!rows || !rows.length) { tbody.innerHTML = '<tr><td colspan="7" class="empty">No games</td></tr>'; return; }
  tbody.replaceChildren(...rows.map((g, i) => {
    const tr = document.createElement('tr');
    tr.dataset.index = i;
    [g.match_label, g.win_home_pct, g.win_away_pct, g.edge_home_str, g.edge_away_str, g.spread_str, g.total_str]
      .forEach(text => { const td = document.createElement('td'); td.textContent = text; tr.appendChild(td); });
    return tr;
  }));
}

function renderChart(c) {
  const area = document.getElementById('chart');
  if (!c) return;
  area.innerHTML = '<h3></h3><div id="chart-container"><canvas id="chartCanvas"></canvas></div>';
  area.querySelector('h3').textContent = c.title;
  const canvas = document.getElementById('chartCanvas');
  const ctx = canvas.getContext('2d');
  const W = canvas.parentElement.clientWidth - 32, H = 200;
  canvas.width = W; canvas.height = H;

  const lo = Math.min(0, ...c.values), hi = Math.max(0, ...c.values);
  const range = (hi - lo) || 1;
  const toY = v => H - 20 - ((v - lo) / range) * (H - 40);
  ctx.strokeStyle = c.style.grid_color;
  for (let i = 0; i <= 4; i++) { const y = 20 + i * (H - 40) / 4; ctx.beginPath(); ctx.moveTo(0, y); ctx.lineTo(W, y); ctx.stroke(); }

  const slot = W / c.values.length;
  ctx.font = '12px system-ui';
  c.values.forEach((v, i) => {
    const x = i * slot + slot * 0.2, w = slot * 0.6;
    const y0 = toY(0), y1 = toY(v);
    ctx.fillStyle = c.colors[i];
    ctx.fillRect(x, Math.min(y0, y1), w, Math.abs(y1 - y0));
    ctx.fillStyle = c.style.text_color;
    ctx.fillText(`${c.labels[i]}: ${v.toFixed(1)}`, x, 14);
  });
}

async function loadStatus() {
  const s = await (await fetch('/api/status')).json();
  document.getElementById('status').textContent =
    s.state === 'empty' ? 'Loading…'
    : s.state === 'load_failed' ? 'Load failed: ' + s.error
    : `${s.visible_games}/${s.total_games} games`;
  return s;
}

async function loadTeams() {
  const teams = await (await fetch('/api/teams')).json();
  const sel = document.getElementById('team-filter');
  sel.replaceChildren(new Option('All', 'All'));
  teams.forEach(t => { const op = document.createElement('option'); op.value = t; op.textContent = t; sel.appendChild(op); });
}

async function applyFilters() {
  renderRows(await post('/api/filter', {
    team: document.getElementById('team-filter').value,
    min_edge: Number(document.getElementById('min-edge').value) || 0,
  }));
  loadStatus();
}

async function setTheme(name) {
  document.body.dataset.theme = name;
  const r = await fetch('/api/chart?theme=' + name);
  renderChart(await r.json());
}

document.getElementById('team-filter').addEventListener('change', applyFilters);
document.getElementById('min-edge').addEventListener('input', applyFilters);
document.querySelectorAll('th.sortable').forEach(th =>
  th.addEventListener('click', async () => renderRows(await post('/api/sort', { key: th.dataset.key }))));
document.getElementById('rows').addEventListener('click', async e => {
  const tr = e.target.closest('tr[data-index]');
  if (tr) renderChart(await post('/api/select', { index: Number(tr.dataset.index), theme: theme() }));
});

// Poll until the background load settles, then fill the page once.
let loaded = false;
async function refresh() {
  if (loaded) return;
  const s = await loadStatus();
  if (s.state === 'empty' || loaded) return;
  loaded = true;
  clearInterval(poller);
  if (s.state === 'load_failed') { renderRows([]); return; }
  await loadTeams();
  document.getElementById('team-filter').value = s.criteria.team;
  document.getElementById('min-edge').value = s.criteria.min_edge;
  renderRows(await (await fetch('/api/rows')).json());
}
const poller = setInterval(refresh, 2000);
refresh();
</script>
</body>
</html>"#;
