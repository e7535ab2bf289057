//! Captured-shape upstream pages served by mockito

pub const RELEASE_ARCHIVE: &str = r#"<html><body>
<div class="release-item">
  <a href="/releases/editor/whats-new/2020.3.34">Unity 2020.3.34</a>
  <span class="release-date">April 20, 2022</span>
</div>
<div class="release-item">
  <a href="/releases/editor/whats-new/2021.3.1">Unity 2021.3.1</a>
  <span class="release-date">May 5, 2022</span>
</div>
</body></html>"#;

pub const ALPHA_LIST: &str = r#"<html><body>
<div class="release-item">
  <h4 class="release-title">2023.1.0a14</h4>
  <p>Released: October 5, 2022</p>
</div>
</body></html>"#;

pub const BETA_LIST: &str = r#"<html><body>
<div class="release-item">
  <h4 class="release-title">2022.2.0b9</h4>
  <p>Released: September 21, 2022</p>
</div>
</body></html>"#;

pub const RELEASE_DETAIL: &str = r#"<html><body>
<a class="btn" href="unityhub://2020.3.34f1/9a4c9c70452b">Install with Unity Hub</a>
</body></html>"#;

pub const WIN_MANIFEST: &str = "[Unity]
title=Unity 2020.3.34f1
url=Windows64EditorInstaller/UnitySetup64-2020.3.34f1.exe

[Android]
title=Android Build Support
url=TargetSupportInstaller/UnitySetup-Android-Support-for-Editor-2020.3.34f1.exe
install=WindowsEditorTargetInstaller

[Mac-Mono]
title=Mac Build Support (Mono)
url=WindowsEditorTargetInstaller/UnitySetup-Mac-Mono-Support-for-Editor-2020.3.34f1.exe
";

pub const LISTING_PATHS: [(&str, &str); 3] = [
    ("/releases/editor/alpha", ALPHA_LIST),
    ("/releases/editor/beta", BETA_LIST),
    ("/releases/editor/archive", RELEASE_ARCHIVE),
];
