use axum::response::{Html, IntoResponse};

// Serve the single-page UI
pub async fn serve_index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>SignalQR</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, 'Open Sans', 'Helvetica Neue', sans-serif;
            margin: 0;
            color: #1f2933;
            background: #f1f5f9;
        }
        .page {
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
            padding: 20px;
            box-sizing: border-box;
        }
        .card {
            width: 100%;
            max-width: 720px;
            background: white;
            border-radius: 12px;
            padding: 24px;
            box-shadow: 0 2px 12px rgba(0, 0, 0, 0.08);
        }
        .header {
            display: flex;
            align-items: center;
            gap: 10px;
        }
        .title {
            margin: 0;
            color: #0f172a;
        }
        .badge {
            background: #dbeafe;
            color: #1d4ed8;
            border-radius: 999px;
            padding: 2px 10px;
            font-size: 12px;
            font-weight: 600;
        }
        .subtitle {
            color: #64748b;
        }
        .input-row {
            display: flex;
            gap: 8px;
        }
        .input {
            flex: 1;
            padding: 10px 12px;
            border: 1px solid #cbd5e1;
            border-radius: 8px;
            font-size: 15px;
        }
        .button {
            background-color: #2563eb;
            color: white;
            border: none;
            padding: 10px 15px;
            border-radius: 8px;
            cursor: pointer;
            font-size: 14px;
        }
        .button.secondary {
            background-color: #0f172a;
        }
        .button:disabled {
            background-color: #94a3b8;
            cursor: not-allowed;
        }
        .content {
            display: flex;
            flex-wrap: wrap;
            gap: 24px;
            margin: 24px 0;
        }
        .qr-box {
            width: 240px;
            height: 240px;
            border: 2px dashed #cbd5e1;
            border-radius: 12px;
            display: flex;
            align-items: center;
            justify-content: center;
        }
        .placeholder {
            color: #94a3b8;
            text-align: center;
            padding: 16px;
        }
        .hints {
            flex: 1;
            min-width: 220px;
        }
        .notice {
            color: #b91c1c;
            min-height: 1.2em;
        }
        .actions {
            display: flex;
            gap: 8px;
        }
        .footer {
            display: flex;
            justify-content: space-between;
            align-items: center;
            margin-top: 24px;
            color: #64748b;
            font-size: 13px;
        }
        .icon-btn {
            width: 28px;
            height: 28px;
            border-radius: 50%;
            border: 1px solid #cbd5e1;
            background: white;
            cursor: pointer;
            font-weight: bold;
        }
        .about {
            display: none;
            margin-top: 12px;
            color: #475569;
            font-size: 14px;
            line-height: 1.5;
        }
        .about.open {
            display: block;
        }
    </style>
</head>
<body>
    <div class="page">
        <div class="card">
            <div class="header">
                <h1 class="title">SignalQR</h1>
                <span class="badge">Instant</span>
            </div>
            <p class="subtitle">Create a QR from any text or URL. It updates as you type.</p>

            <div class="input-row">
                <input id="text" class="input" type="text" placeholder="Paste a link or type anything..." autocomplete="off">
                <button id="clear" class="button" aria-label="Clear input">Clear</button>
            </div>

            <div class="content">
                <div id="qr-box" class="qr-box">
                    <div class="placeholder">Your QR code will appear here</div>
                </div>

                <div class="hints">
                    <h3>Tips</h3>
                    <ul>
                        <li>Works great with website links, Wi-Fi passwords, or short notes.</li>
                        <li>Make sure your screen brightness is up when scanning.</li>
                        <li>Longer text still works, the pattern just gets denser.</li>
                    </ul>
                </div>
            </div>

            <p id="notice" class="notice" role="status"></p>

            <div class="actions">
                <button id="download-jpg" class="button secondary" disabled>Download JPG</button>
                <button id="download-pdf" class="button secondary" disabled>Download PDF</button>
            </div>

            <div class="footer">
                <span>Ma'din R&amp;D Labs &copy; <span id="year"></span></span>
                <button id="about-toggle" class="icon-btn" aria-expanded="false" aria-controls="about-panel" title="About Ma'din R&amp;D Labs">i</button>
            </div>

            <div id="about-panel" class="about">
                <p>
                    Ma'din R&amp;D Labs is the research and development hub of <a href="https://madin.edu.in/">Ma'din Academy</a>.
                    We are a creative tech team dedicated to innovating and managing the Academy's digital
                    ecosystem, from mobile apps and ERP systems to new platforms that empower students,
                    staff, and the community. As a center of innovation, we drive Ma'din's digital transformation with purpose,
                    combining research, development, and values. Our mission is to brighten today with solutions that work while shaping tomorrow with technology that inspires.
                    At Ma'din R&amp;D Labs, we believe technology is not just about tools, it's about creating meaningful,
                    human-centered experiences that reflect knowledge, guidance, and progress.
                </p>
            </div>
        </div>
    </div>

    <script>
        const input = document.getElementById('text');
        const qrBox = document.getElementById('qr-box');
        const notice = document.getElementById('notice');
        const jpgButton = document.getElementById('download-jpg');
        const pdfButton = document.getElementById('download-pdf');
        const aboutToggle = document.getElementById('about-toggle');
        const aboutPanel = document.getElementById('about-panel');
        let revision = 0;

        document.getElementById('year').textContent = new Date().getFullYear();

        function apply(view) {
            // Responses to older keystrokes may arrive late
            if (view.revision < revision) return;
            revision = view.revision;

            if (document.activeElement !== input) input.value = view.text;

            qrBox.replaceChildren();
            if (view.qr_data_url) {
                const img = document.createElement('img');
                img.src = view.qr_data_url;
                img.alt = 'QR code';
                img.width = 220;
                img.height = 220;
                qrBox.appendChild(img);
            } else {
                const placeholder = document.createElement('div');
                placeholder.className = 'placeholder';
                placeholder.textContent = 'Your QR code will appear here';
                qrBox.appendChild(placeholder);
            }

            jpgButton.disabled = !view.exports_enabled;
            pdfButton.disabled = !view.exports_enabled;
            notice.textContent = view.notice || '';

            aboutPanel.classList.toggle('open', view.about_visible);
            aboutToggle.setAttribute('aria-expanded', String(view.about_visible));
        }

        async function call(method, path, body) {
            const options = { method, headers: {} };
            if (body !== undefined) {
                options.headers['Content-Type'] = 'application/json';
                options.body = JSON.stringify(body);
            }
            const response = await fetch(path, options);
            if (!response.ok) throw new Error(`${method} ${path} failed: ${response.status}`);
            return response.json();
        }

        function filenameFrom(response, fallback) {
            const disposition = response.headers.get('Content-Disposition') || '';
            const match = disposition.match(/filename="([^"]+)"/);
            return match ? match[1] : fallback;
        }

        async function download(format) {
            try {
                const response = await fetch(`/api/export/${format}?rev=${revision}`);
                if (!response.ok) {
                    const body = await response.json().catch(() => ({}));
                    console.error(body.error || response.status);
                    alert(body.notice || `Could not export ${format.toUpperCase()}.`);
                    return;
                }
                const blob = await response.blob();
                const url = URL.createObjectURL(blob);
                const a = document.createElement('a');
                a.href = url;
                a.download = filenameFrom(response, `qr-${Date.now()}.${format}`);
                document.body.appendChild(a);
                a.click();
                a.remove();
                URL.revokeObjectURL(url);
            } catch (e) {
                console.error(e);
                alert(`Could not export ${format.toUpperCase()}. Try a different browser.`);
            }
        }

        input.addEventListener('input', () => {
            call('PUT', '/api/text', { text: input.value }).then(apply).catch(console.error);
        });
        document.getElementById('clear').addEventListener('click', () => {
            input.value = '';
            call('POST', '/api/clear').then(apply).catch(console.error);
        });
        aboutToggle.addEventListener('click', () => {
            call('POST', '/api/about/toggle').then(apply).catch(console.error);
        });
        jpgButton.addEventListener('click', () => download('jpg'));
        pdfButton.addEventListener('click', () => download('pdf'));

        call('GET', '/api/state').then(apply).catch(console.error);
    </script>
</body>
</html>
"##;
