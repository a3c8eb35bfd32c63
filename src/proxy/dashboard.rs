//! HTML dashboard for the live request counters.

use tera::{Context, Tera};

use super::counters::CounterSnapshot;

const TEMPLATE_NAME: &str = "dashboard.html";

const DASHBOARD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Catalyst AI | API Analytics</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        body { background-color: #050505; color: #e5e5e5; }
        .glass { background: rgba(255, 255, 255, 0.03); border: 1px solid rgba(255, 255, 255, 0.1); }
        .stat-card:hover { border-color: #38bdf8; transition: 0.3s; }
    </style>
</head>
<body class="p-4 md:p-10">
    <main class="max-w-6xl mx-auto">
        <header class="flex flex-col md:flex-row justify-between items-center mb-10 glass p-6 rounded-2xl">
            <div>
                <h1 class="text-3xl font-bold text-sky-400">Catalyst AI Wrapper</h1>
                <p class="text-gray-400">High-Performance AI Model Gateway</p>
                <p class="text-xs text-gray-500 mt-1">Default model: <span class="font-mono">{{ default_model }}</span></p>
            </div>
            <div class="mt-4 md:mt-0 text-center md:text-right">
                <span class="text-xs font-mono text-sky-500 uppercase tracking-widest">Global Traffic</span>
                <div id="total-requests" class="text-4xl font-black text-white">{{ total_requests }}</div>
            </div>
        </header>

        <section class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6">
            {% for entry in models %}
            <div class="glass p-6 rounded-2xl stat-card" data-model="{{ entry.model }}">
                <h3 class="text-lg font-semibold">{{ entry.model | capitalize }}</h3>
                <p class="text-3xl font-bold mt-2">{{ entry.count }} <span class="text-sm font-normal text-gray-500">reqs</span></p>
            </div>
            {% endfor %}
        </section>

        <section class="mt-10 glass p-6 rounded-2xl">
            <h2 class="text-xl font-bold mb-4 text-sky-400">API Documentation</h2>
            <div class="bg-black/50 p-4 rounded-lg font-mono text-sm text-green-400 overflow-x-auto">
                GET /api?model={model_name}&amp;q={your_prompt}
            </div>
        </section>
    </main>
</body>
</html>
"#;

/// Renders counter snapshots into the dashboard page.
#[derive(Debug)]
pub struct Dashboard {
    tera: Tera,
}

impl Dashboard {
    /// Compile the dashboard template.
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, DASHBOARD_TEMPLATE)?;
        Ok(Self { tera })
    }

    pub fn render(
        &self,
        snapshot: &CounterSnapshot,
        default_model: &str,
    ) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("total_requests", &snapshot.total_requests);
        context.insert("models", &snapshot.models);
        context.insert("default_model", default_model);
        self.tera.render(TEMPLATE_NAME, &context)
    }
}
