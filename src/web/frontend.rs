//! Embedded HTML/CSS/JS frontend for the resonanze web dashboard.
//!
//! The page only renders what `GET /api/dashboard` returns; every derived
//! value (ratios, labels, colours, cleaned findings) is computed server-side.
//! No external assets, no build tools, no CDN dependencies.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>resonanze Dashboard</title>
<style>
:root {
  --bg: #fdf2f8;
  --surface: #ffffff;
  --border: #fbcfe8;
  --text: #1f2937;
  --text-muted: #6b7280;
  --accent: #ec4899;
  --ok: #16a34a;
  --warn: #d97706;
  --radius: 12px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: var(--font); background: var(--bg); color: var(--text); line-height: 1.5; }
header { padding: 24px 32px; display: flex; justify-content: space-between; align-items: center; }
header h1 { font-size: 22px; }
button { background: var(--accent); color: #fff; border: 0; border-radius: 8px; padding: 8px 16px; cursor: pointer; }
main { padding: 0 32px 32px; display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 20px; }
.card { background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius); padding: 20px; }
.card h2 { font-size: 15px; margin-bottom: 12px; color: var(--text-muted); text-transform: uppercase; letter-spacing: .04em; }
.gauge { margin-bottom: 14px; }
.gauge .row { display: flex; justify-content: space-between; font-size: 14px; }
.bar { height: 10px; background: var(--border); border-radius: 5px; overflow: hidden; margin-top: 4px; }
.bar > div { height: 100%; background: var(--accent); }
.status-normal { color: var(--ok); }
.status-elevated { color: var(--warn); }
.status-unknown { color: var(--text-muted); }
.slice { display: flex; align-items: center; gap: 8px; font-size: 14px; margin-bottom: 6px; }
.swatch { width: 12px; height: 12px; border-radius: 3px; }
table { width: 100%; border-collapse: collapse; font-size: 14px; }
th, td { text-align: left; padding: 4px 0; }
th { color: var(--text-muted); font-weight: 500; }
.findings { white-space: pre-wrap; font-size: 14px; }
.muted { color: var(--text-muted); font-size: 14px; }
.failed { padding: 32px; color: #b91c1c; font-weight: 600; }
</style>
</head>
<body>
<header>
  <h1 id="greeting">Loading...</h1>
  <button id="refresh">Refresh</button>
</header>
<div id="root"></div>
<script>
const esc = (s) => String(s).replace(/[&<>"']/g, (c) => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}[c]));

function gauge(g) {
  return `<div class="gauge">
    <div class="row"><span>${esc(g.label)}</span>
    <span>${esc(g.display)} <span class="status-${g.status}">${g.status}</span></span></div>
    <div class="bar"><div style="width:${g.ratio}%"></div></div></div>`;
}

function render(view) {
  document.getElementById('greeting').textContent = view.greeting;
  const slices = view.distribution.length === 0
    ? '<p class="muted">No predictions yet.</p>'
    : view.distribution.map((s) =>
        `<div class="slice"><span class="swatch" style="background:${s.color}"></span>${esc(s.name)}: ${s.value}</div>`).join('');
  const weekly = view.weekly.points.length === 0
    ? '<p class="muted">No sessions this week.</p>'
    : `<table><tr><th>Date</th><th>Jitter</th><th>Shimmer</th></tr>${view.weekly.points.map((p) =>
        `<tr><td>${esc(p.tick)}</td><td>${p.jitter == null ? '-' : p.jitter.toFixed(2) + '%'}</td><td>${p.shimmer == null ? '-' : p.shimmer.toFixed(2) + '%'}</td></tr>`).join('')}</table>`;
  const findings = view.latest_findings
    ? `<div class="findings">${esc(view.latest_findings)}</div>`
    : '<p class="muted">No reports yet.</p>';

  document.getElementById('root').innerHTML = `<main>
    <section class="card"><h2>Voice Stability</h2>${gauge(view.stability.jitter)}${gauge(view.stability.shimmer)}</section>
    <section class="card"><h2>Exercise Progress</h2>
      <div class="gauge"><div class="row"><span>Completed</span><span>${esc(view.exercises.display)}</span></div>
      <div class="bar"><div style="width:${view.exercises.ratio}%"></div></div></div></section>
    <section class="card"><h2>Prediction Distribution</h2>${slices}</section>
    <section class="card"><h2>Weekly Progress</h2>${weekly}</section>
    <section class="card"><h2>Latest AI Findings</h2>${findings}
      <p class="muted">${view.report_count} recent report(s)</p></section>
  </main>`;
}

async function load() {
  document.getElementById('greeting').textContent = 'Loading...';
  document.getElementById('root').innerHTML = '';
  try {
    const res = await fetch('/api/dashboard');
    const state = await res.json();
    if (state.state === 'loaded') {
      render(state);
      return;
    }
  } catch (e) {}
  document.getElementById('greeting').textContent = 'Dashboard';
  document.getElementById('root').innerHTML = '<div class="failed">Failed to load data</div>';
}

document.getElementById('refresh').addEventListener('click', load);
load();
</script>
</body>
</html>
"##;
