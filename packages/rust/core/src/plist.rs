//! `Info.plist` rendering for the docset bundle.

use docpack_shared::DocsetInfo;

/// Render the bundle's `Info.plist`.
pub fn info_plist(info: &DocsetInfo) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
  <dict>
    <key>CFBundleIdentifier</key>
    <string>{bundle_id}</string>
    <key>CFBundleName</key>
    <string>{name}</string>
    <key>CFBundleVersion</key>
    <string>{version}</string>
    <key>dashIndexFilePath</key>
    <string>{index_file}</string>
    <key>DocSetPlatformFamily</key>
    <string>{platform_family}</string>
    <key>isDashDocset</key>
    <true/>
    <key>isJavaScriptEnabled</key>
    <true/>
    <key>DashDocSetFamily</key>
    <string>dashtoc</string>
  </dict>
</plist>
"#,
        bundle_id = xml_escape(&info.bundle_id),
        name = xml_escape(&info.name),
        version = xml_escape(&info.version),
        index_file = xml_escape(&info.index_file),
        platform_family = xml_escape(&info.platform_family),
    )
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
