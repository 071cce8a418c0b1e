use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use chrono::Utc;

use crate::common::AppState;
use crate::view::DashboardView;

pub async fn dashboard() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Html(DASHBOARD_HTML),
    )
}

/// Current dashboard view: latest reading, chart series for the selected
/// window, countdown and feed status
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard view", body = DashboardView),
    ),
    tag = "dashboard"
)]
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    Json(
        state
            .dashboard
            .view(Utc::now(), &state.config.display_timezone),
    )
}

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Climinha</title>
    <style>
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            min-height: 100vh;
            background: #f9fafb;
            display: flex;
            flex-direction: column;
            align-items: center;
            padding: 40px 20px;
            font-family: sans-serif;
            position: relative;
        }
        h1 { font-size: 2rem; margin-bottom: 40px; color: #111827; }
        h2 { font-size: 1.5rem; margin-bottom: 20px; color: #374151; }
        .card {
            background: #ffffff;
            border-radius: 16px;
            box-shadow: 0 4px 20px rgba(0,0,0,0.05);
            width: 100%;
        }
        #countdown {
            position: absolute;
            top: 20px;
            right: 20px;
            padding: 6px 12px;
            border-radius: 12px;
            font-weight: bold;
            font-size: 14px;
            color: #505050;
            width: auto;
            user-select: none;
        }
        #current { padding: 30px 40px; margin-bottom: 50px; text-align: center; max-width: 500px; }
        #current .temp { font-size: 48px; font-weight: 600; display: block; margin-bottom: 1rem; }
        #current .when { color: #333333; }
        #stale {
            display: none;
            margin-bottom: 20px;
            padding: 8px 12px;
            border-radius: 8px;
            background: #fef3c7;
            color: #92400e;
            font-size: 14px;
        }
        #history { padding: 30px; max-width: 800px; }
        #filters { margin-bottom: 20px; display: flex; gap: 10px; flex-wrap: wrap; }
        #filters button {
            padding: 8px 12px;
            border-radius: 8px;
            border: none;
            background: #e5e7eb;
            color: #111827;
            cursor: pointer;
            font-weight: bold;
        }
        #filters button.active { background: #10b981; color: white; }
        #chart { width: 100%; height: 320px; cursor: grab; touch-action: none; }
        #chart text { font-size: 10px; fill: #444; }
        #empty { display: none; }
    </style>
</head>
<body>
    <div id="countdown" class="card" title="Segundos para próximo reload"></div>
    <h1>Climinha</h1>

    <div id="current" class="card">
        <h2>Temperatura Atual</h2>
        <div id="stale"></div>
        <div id="current-body"><p>Carregando...</p></div>
    </div>

    <div id="history" class="card">
        <h2>Histórico de Temperaturas</h2>
        <div id="filters"></div>
        <svg id="chart" viewBox="0 0 800 320" preserveAspectRatio="none"></svg>
        <p id="empty">Nenhum dado nesse período.</p>
    </div>

    <script>
        const W = 800, H = 320, PAD = 30;
        let view = null;
        // Visible index range; null means the full series
        let range = null;
        let drag = null;

        async function refresh() {
            try {
                const res = await fetch('/api/dashboard');
                render(await res.json());
            } catch (e) {
                console.error('Falha ao atualizar painel', e);
            }
        }

        async function selectWindow(key) {
            const res = await fetch('/api/window', {
                method: 'PUT',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ window: key }),
            });
            range = null;
            if (res.ok) render(await res.json());
        }

        function render(v) {
            const seriesChanged = !view || view.series.values.length !== v.series.values.length
                || view.window.key !== v.window.key;
            view = v;
            if (seriesChanged) range = null;

            document.getElementById('countdown').textContent = `Atualizando em: ${v.countdown}s`;

            const stale = document.getElementById('stale');
            if (v.status.state === 'stale') {
                stale.style.display = 'block';
                stale.textContent = 'Dados desatualizados: falha ao buscar temperaturas.';
            } else {
                stale.style.display = 'none';
            }

            const body = document.getElementById('current-body');
            if (v.current) {
                body.innerHTML = '';
                const temp = document.createElement('span');
                temp.className = 'temp';
                temp.style.color = v.current.color;
                temp.textContent = v.current.display;
                const when = document.createElement('span');
                when.className = 'when';
                when.textContent = v.current.label;
                body.append(temp, when);
            } else {
                body.innerHTML = '<p>Carregando...</p>';
            }

            const filters = document.getElementById('filters');
            filters.innerHTML = '';
            for (const w of v.windows) {
                const b = document.createElement('button');
                b.textContent = w.label;
                if (w.key === v.window.key) b.className = 'active';
                b.onclick = () => selectWindow(w.key);
                filters.append(b);
            }

            const chart = document.getElementById('chart');
            const empty = document.getElementById('empty');
            if (!v.series.has_data) {
                chart.style.display = 'none';
                empty.style.display = 'block';
                return;
            }
            chart.style.display = 'block';
            empty.style.display = 'none';
            drawChart(chart);
        }

        function drawChart(svg) {
            const { values, labels, color } = view.series;
            const { y_min, y_max } = view.chart;
            const n = values.length;
            const [lo, hi] = range || [0, n - 1];
            const span = Math.max(hi - lo, 1);
            const x = i => PAD + (i - lo) / span * (W - 2 * PAD);
            const y = t => H - PAD - (Math.min(Math.max(t, y_min), y_max) - y_min) / (y_max - y_min) * (H - 2 * PAD);

            const points = [];
            for (let i = Math.floor(lo); i <= Math.ceil(hi) && i < n; i++) {
                points.push(`${x(i).toFixed(1)},${y(values[i]).toFixed(1)}`);
            }
            const first = Math.max(Math.ceil(lo), 0);
            const last = Math.min(Math.floor(hi), n - 1);
            svg.innerHTML = `
                <line x1="${PAD}" y1="${H - PAD}" x2="${W - PAD}" y2="${H - PAD}" stroke="#ddd"/>
                <text x="2" y="${PAD}">${y_max}</text>
                <text x="2" y="${H - PAD}">${y_min}</text>
                <text x="${PAD}" y="${H - 8}">${labels[first]}</text>
                <text x="${W - PAD}" y="${H - 8}" text-anchor="end">${labels[last]}</text>
                <polyline fill="none" stroke="${color}" stroke-width="2" points="${points.join(' ')}"/>`;
        }

        function clampRange(lo, hi) {
            const max = view.series.values.length - 1;
            const span = Math.min(hi - lo, max);
            if (lo < 0) { lo = 0; hi = span; }
            if (hi > max) { hi = max; lo = max - span; }
            return span >= max ? null : [lo, hi];
        }

        const chart = document.getElementById('chart');
        chart.addEventListener('wheel', e => {
            if (!view || !view.series.has_data || !view.chart.wheel_zoom) return;
            e.preventDefault();
            const n = view.series.values.length;
            const [lo, hi] = range || [0, n - 1];
            const rect = chart.getBoundingClientRect();
            const focus = lo + (e.clientX - rect.left) / rect.width * (hi - lo);
            const factor = e.deltaY < 0 ? 0.8 : 1.25;
            const newLo = focus - (focus - lo) * factor;
            const newHi = focus + (hi - focus) * factor;
            range = newHi - newLo < 2 ? range : clampRange(newLo, newHi);
            drawChart(chart);
        }, { passive: false });
        chart.addEventListener('pointerdown', e => {
            if (view && view.chart.pan && range) drag = { x: e.clientX, range };
        });
        window.addEventListener('pointerup', () => { drag = null; });
        chart.addEventListener('pointermove', e => {
            if (!drag) return;
            const rect = chart.getBoundingClientRect();
            const delta = (drag.x - e.clientX) / rect.width * (drag.range[1] - drag.range[0]);
            range = clampRange(drag.range[0] + delta, drag.range[1] + delta);
            drawChart(chart);
        });

        refresh();
        setInterval(refresh, 1000);
    </script>
</body>
</html>
"##;
