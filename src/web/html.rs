//! The single-file page served by the web mirror.

/// Two panes and an input box, fed over `/ws`.
///
/// Pane content arrives already escaped, so it is assigned with `innerHTML`.
/// History keys are sent to the server, which answers with `set_input` from
/// the console's own persisted history.
pub const CONSOLE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Remote Console</title>
    <style>
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: Menlo, Consolas, monospace;
            background: #1e1e1e;
            color: #ddd;
            height: 100vh;
        }
        .window {
            position: fixed;
            left: 10px;
            right: 10px;
            bottom: 10px;
            height: 200px;
            background: #252526;
            border: 1px solid #3c3c3c;
            display: flex;
            flex-direction: column;
            padding: 10px;
            gap: 10px;
        }
        .panes { flex: 1; display: flex; gap: 10px; min-height: 0; }
        .pane {
            overflow-y: auto;
            font-size: 12px;
            line-height: 1.3;
            white-space: pre-wrap;
            word-break: break-all;
            background: #1e1e1e;
            padding: 4px;
        }
        #page { flex: 1; }
        #remote { flex: 2; }
        #input {
            width: calc(100% - 90px);
            height: 20px;
            background: #3c3c3c;
            color: #fff;
            border: none;
            padding: 0 4px;
            font-family: inherit;
        }
        .status { font-size: 11px; color: #888; }
        .status.live { color: #4ec9b0; }
    </style>
</head>
<body>
    <div class="window">
        <div class="panes">
            <div class="pane" id="page"></div>
            <div class="pane" id="remote"></div>
        </div>
        <div>
            <input id="input" type="text" autocomplete="off">
            <span class="status" id="status">connecting</span>
        </div>
    </div>
    <script>
        const panes = {
            page: document.getElementById('page'),
            remote: document.getElementById('remote'),
        };
        const input = document.getElementById('input');
        const status = document.getElementById('status');
        let ws = null;

        function send(message) {
            if (!ws || ws.readyState !== WebSocket.OPEN) return false;
            ws.send(JSON.stringify(message));
            return true;
        }

        function connect() {
            ws = new WebSocket(`ws://${location.host}/ws`);
            ws.onopen = () => {
                status.textContent = 'live';
                status.classList.add('live');
            };
            ws.onclose = () => {
                status.textContent = 'reconnecting';
                status.classList.remove('live');
                setTimeout(connect, 1000);
            };
            ws.onmessage = (event) => {
                const msg = JSON.parse(event.data);
                if (msg.type === 'set_input') {
                    input.value = msg.text;
                    input.setSelectionRange(msg.text.length, msg.text.length);
                    return;
                }
                const node = panes[msg.pane];
                if (!node) return;
                if (msg.type === 'set_content') {
                    node.innerHTML = msg.html;
                } else if (msg.type === 'scroll_to_bottom') {
                    node.scrollTop = node.scrollHeight;
                }
            };
        }

        input.addEventListener('focus', () => {
            send({ type: 'focus' });
        });

        input.addEventListener('keydown', (event) => {
            if (event.key === 'Enter') {
                const text = input.value;
                if (text.trim() === '') return;
                if (send({ type: 'submit', text })) input.value = '';
            } else if (event.key === 'ArrowUp') {
                send({ type: 'history', direction: 'up' });
                event.preventDefault();
            } else if (event.key === 'ArrowDown') {
                send({ type: 'history', direction: 'down' });
                event.preventDefault();
            }
        });

        connect();
    </script>
</body>
</html>
"#;
