pub mod visibility;

use crate::jsonurl;
use crate::models::*;

pub use visibility::visible_fields;

/// Presence-only flag requesting one image per component
pub const INDIVIDUAL_FLAG: &str = "&individual";

/// Incrementally appends `&key=value` pairs to a base endpoint.
/// Optional values are skipped when blank; the API falls back to its
/// default for any parameter that is absent.
pub struct QueryString {
    buf: String,
}

impl QueryString {
    pub fn new(endpoint: &str) -> Self {
        Self {
            buf: endpoint.to_string(),
        }
    }

    /// Always emitted, even when blank
    pub fn required(&mut self, key: &str, value: &str) -> &mut Self {
        self.buf.push('&');
        self.buf.push_str(key);
        self.buf.push('=');
        self.buf.push_str(value);
        self
    }

    /// Emitted only when the value is not blank
    pub fn optional(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.trim().is_empty() {
            self.required(key, value);
        }
        self
    }

    /// `&key` with no value, only when set
    pub fn flag(&mut self, key: &str, set: bool) -> &mut Self {
        if set {
            self.buf.push('&');
            self.buf.push_str(key);
        }
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Build the rendering API URL for the active tab
pub fn build_url(endpoint: &str, config: &ProductConfig) -> anyhow::Result<String> {
    let url = match config {
        ProductConfig::Fa(fa) => fa_url(endpoint, fa)?,
        ProductConfig::Fb(fb) => fb_url(endpoint, fb)?,
        ProductConfig::Fbs(fbs) => fbs_url(endpoint, fbs)?,
    };
    tracing::debug!("Built diagram URL: {}", url);
    Ok(url)
}

/// Build the URL plus the vssx download and JSON metadata variants
pub fn diagram_urls(endpoint: &str, config: &ProductConfig) -> anyhow::Result<DiagramUrls> {
    let url = build_url(endpoint, config)?;
    Ok(DiagramUrls {
        vssx_url: vssx_url(&url),
        json_url: json_url(&url),
        url,
    })
}

/// URL that downloads the vector-diagram stencil instead of an image
pub fn vssx_url(url: &str) -> String {
    format!("{}&vssx=True", url)
}

/// URL that returns diagram metadata as JSON. The JSON form is always a
/// single image, so the `individual` flag is dropped.
pub fn json_url(url: &str) -> String {
    format!("{}&json=True", strip_individual(url))
}

fn strip_individual(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut rest = url;
    while let Some(idx) = rest.find(INDIVIDUAL_FLAG) {
        let after = &rest[idx + INDIVIDUAL_FLAG.len()..];
        // Only the bare flag, not a longer parameter name starting with it
        if after.is_empty() || after.starts_with('&') {
            out.push_str(&rest[..idx]);
        } else {
            out.push_str(&rest[..idx + INDIVIDUAL_FLAG.len()]);
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

fn fa_url(endpoint: &str, c: &FaConfig) -> anyhow::Result<String> {
    let mut q = QueryString::new(endpoint);
    q.required("model", &c.model)
        .required("protocol", &c.protocol)
        .required("face", &c.face);

    match &c.datapacks {
        DatapackSource::Legacy(datapacks) => {
            q.optional("datapacks", datapacks);
        }
        DatapackSource::Advanced(shelves) => {
            q.required("datapacksv2", &jsonurl::to_string(shelves)?);
        }
    }

    let addoncards = c
        .addoncards
        .iter()
        .map(|card| card.trim())
        .filter(|card| !card.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    q.optional("bezel", &c.bezel)
        .optional("direction", &c.direction)
        .optional("fm_label", &c.fm_label)
        .optional("dp_label", &c.dp_label)
        .optional("addoncards", &addoncards);

    if c.csize != CSIZE_PLACEHOLDER {
        q.optional("csize", &c.csize);
    }

    q.optional("ports", &c.ports)
        .optional("mezz", &c.mezz)
        .optional("dc_power", &c.dc_power);

    for (slot, card) in c.pci.iter().enumerate().take(PCI_SLOT_COUNT) {
        q.optional(&format!("pci{}", slot), card);
    }

    q.optional("chassis_gen", &c.chassis_gen)
        .flag("individual", c.individual);

    Ok(q.finish())
}

fn fb_url(endpoint: &str, c: &FbConfig) -> anyhow::Result<String> {
    let mut q = QueryString::new(endpoint);
    // FB classic has a single model; the parameter is kept for the API router
    q.required("model", "fb")
        .required("chassis", &c.chassis)
        .required("face", &c.face)
        .required("direction", &c.direction)
        .optional("xfm", &c.xfm);

    match &c.blades {
        BladeSource::Legacy(blades) => {
            q.optional("blades", blades);
        }
        BladeSource::Advanced(chassis) => {
            q.required("bladesv2", &jsonurl::to_string(chassis)?);
        }
    }

    q.optional("efm", &c.efm)
        .optional("xfm_face", &c.xfm_face)
        .optional("xfm_model", &c.xfm_model)
        .optional("ports", &c.ports)
        .flag("individual", c.individual);

    Ok(q.finish())
}

fn fbs_url(endpoint: &str, c: &FbsConfig) -> anyhow::Result<String> {
    let mut q = QueryString::new(endpoint);
    q.required("model", &c.model)
        .required("face", &c.face)
        .optional("direction", &c.direction)
        .optional("xfm", &c.xfm)
        .optional("no_of_chassis", &c.chassis);

    match &c.blades {
        FbsBladeSource::Legacy {
            blades,
            dfm_size,
            dfm_count,
        } => {
            q.optional("no_of_blades", blades)
                .optional("no_of_drives_per_blade", dfm_count)
                .optional("drive_size", dfm_size);
        }
        FbsBladeSource::Advanced(chassis) => {
            q.required("bladesv2", &jsonurl::to_string(chassis)?);
        }
    }

    q.optional("xfm_face", &c.xfm_face)
        .optional("xfm_model", &c.xfm_model)
        .optional("bezel", &c.bezel)
        .optional("ports", &c.ports)
        .flag("individual", c.individual);

    Ok(q.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EP: &str = "https://api.example/rackdiagram?";

    fn fa_back() -> FaConfig {
        FaConfig {
            model: "fa-x20r4".to_string(),
            protocol: "eth".to_string(),
            face: "back".to_string(),
            datapacks: DatapackSource::Legacy("366".to_string()),
            ..Default::default()
        }
    }

    fn shelves() -> ShelfList {
        vec![
            Shelf::default(),
            Shelf {
                datapacks: vec![Datapack {
                    fm_size: "11TB".to_string(),
                    fm_count: 10,
                    dp_label: Some("A".to_string()),
                    fm_type: None,
                    first_slot: None,
                }],
            },
        ]
    }

    #[test]
    fn test_fa_example_url() {
        let url = build_url(EP, &ProductConfig::Fa(fa_back())).unwrap();
        assert!(url.contains("model=fa-x20r4&protocol=eth&face=back&datapacks=366"));
        assert!(!url.contains("&bezel="));
        assert!(!url.contains("&mezz="));
        assert_eq!(
            url,
            "https://api.example/rackdiagram?&model=fa-x20r4&protocol=eth&face=back&datapacks=366"
        );
    }

    #[test]
    fn test_required_params_emitted_when_blank() {
        let url = build_url(EP, &ProductConfig::Fa(FaConfig::default())).unwrap();
        assert_eq!(url, format!("{}&model=&protocol=&face=", EP));

        let url = build_url(EP, &ProductConfig::Fb(FbConfig::default())).unwrap();
        assert_eq!(url, format!("{}&model=fb&chassis=&face=&direction=", EP));

        let url = build_url(EP, &ProductConfig::Fbs(FbsConfig::default())).unwrap();
        assert_eq!(url, format!("{}&model=&face=", EP));
    }

    #[test]
    fn test_fa_full_order() {
        let mut fa = fa_back();
        fa.bezel = "FALSE".to_string();
        fa.direction = "up".to_string();
        fa.fm_label = "TRUE".to_string();
        fa.dp_label = "TRUE".to_string();
        fa.addoncards = vec!["2fc".to_string(), "".to_string(), "4eth25".to_string()];
        fa.csize = "50".to_string();
        fa.ports = "TRUE".to_string();
        fa.mezz = "smezz".to_string();
        fa.dc_power = "TRUE".to_string();
        fa.chassis_gen = "2".to_string();
        fa.individual = true;

        let url = build_url(EP, &ProductConfig::Fa(fa)).unwrap();
        assert_eq!(
            url,
            format!(
                "{}&model=fa-x20r4&protocol=eth&face=back&datapacks=366&bezel=FALSE&direction=up\
                 &fm_label=TRUE&dp_label=TRUE&addoncards=2fc,4eth25&csize=50&ports=TRUE&mezz=smezz\
                 &dc_power=TRUE&chassis_gen=2&individual",
                EP
            )
        );
    }

    #[test]
    fn test_csize_placeholder_omitted() {
        let mut fa = fa_back();
        fa.csize = CSIZE_PLACEHOLDER.to_string();
        let url = build_url(EP, &ProductConfig::Fa(fa)).unwrap();
        assert!(!url.contains("csize"));
    }

    #[test]
    fn test_pci_slots_keep_index() {
        let mut fa = fa_back();
        fa.pci = vec![
            "".to_string(),
            "2fc".to_string(),
            "".to_string(),
            "".to_string(),
            "sas".to_string(),
        ];
        let url = build_url(EP, &ProductConfig::Fa(fa)).unwrap();
        assert!(url.ends_with("&pci1=2fc&pci4=sas"));
        assert!(!url.contains("pci0"));
        assert!(!url.contains("pci2"));
    }

    #[test]
    fn test_pci_slots_past_last_ignored() {
        let mut fa = fa_back();
        fa.pci = vec!["2fc".to_string(); 12];
        let url = build_url(EP, &ProductConfig::Fa(fa)).unwrap();
        assert!(url.contains("&pci8=2fc"));
        assert!(!url.contains("pci9"));
    }

    #[test]
    fn test_individual_is_presence_flag() {
        let mut fa = fa_back();
        fa.individual = true;
        let url = build_url(EP, &ProductConfig::Fa(fa.clone())).unwrap();
        assert!(url.ends_with("&individual"));
        assert!(!url.contains("individual="));

        fa.individual = false;
        let url = build_url(EP, &ProductConfig::Fa(fa)).unwrap();
        assert!(!url.contains("individual"));
    }

    #[test]
    fn test_datapacksv2_replaces_legacy() {
        let mut fa = fa_back();
        fa.datapacks = DatapackSource::Advanced(shelves());
        let url = build_url(EP, &ProductConfig::Fa(fa)).unwrap();
        assert!(url.contains(
            "&datapacksv2=((datapacks:()),(datapacks:((fm_size:11TB,fm_count:10,dp_label:A))))"
        ));
        assert!(!url.contains("&datapacks="));
    }

    #[test]
    fn test_fb_blades_legacy_and_advanced() {
        let mut fb = FbConfig {
            chassis: "2".to_string(),
            face: "front".to_string(),
            direction: "up".to_string(),
            blades: BladeSource::Legacy("17:0-14,52:15-129".to_string()),
            ..Default::default()
        };
        let url = build_url(EP, &ProductConfig::Fb(fb.clone())).unwrap();
        assert_eq!(
            url,
            format!("{}&model=fb&chassis=2&face=front&direction=up&blades=17:0-14,52:15-129", EP)
        );

        fb.blades = BladeSource::Advanced(vec![BladeChassis::new("1")]);
        fb.efm = "efm310".to_string();
        let url = build_url(EP, &ProductConfig::Fb(fb)).unwrap();
        assert!(url.contains("&bladesv2=((gen:'1',blades:()))&efm=efm310"));
        assert!(!url.contains("&blades="));
    }

    #[test]
    fn test_fbs_legacy_params() {
        let fbs = FbsConfig {
            model: "fb-s200".to_string(),
            face: "back".to_string(),
            blades: FbsBladeSource::Legacy {
                blades: "7".to_string(),
                dfm_size: "48".to_string(),
                dfm_count: "2".to_string(),
            },
            xfm_model: "3200e".to_string(),
            ports: "TRUE".to_string(),
            ..Default::default()
        };
        let url = build_url(EP, &ProductConfig::Fbs(fbs)).unwrap();
        assert_eq!(
            url,
            format!(
                "{}&model=fb-s200&face=back&no_of_blades=7&no_of_drives_per_blade=2&drive_size=48\
                 &xfm_model=3200e&ports=TRUE",
                EP
            )
        );
    }

    #[test]
    fn test_fbs_bladesv2_excludes_legacy_params() {
        let fbs = FbsConfig {
            model: "fb-s500".to_string(),
            face: "front".to_string(),
            chassis: "2".to_string(),
            blades: FbsBladeSource::Advanced(vec![BladeChassis {
                gen: "1".to_string(),
                blades: vec![BladeConfig {
                    bays: vec![1, 2],
                    dfm_size: "75TB".to_string(),
                    blade_count: 3,
                    first_slot: 1,
                    blade_model: "s500".to_string(),
                }],
            }]),
            ..Default::default()
        };
        let url = build_url(EP, &ProductConfig::Fbs(fbs)).unwrap();
        assert!(url.contains("&no_of_chassis=2&bladesv2=("));
        assert!(!url.contains("no_of_blades"));
        assert!(!url.contains("no_of_drives_per_blade"));
        assert!(!url.contains("drive_size"));
    }

    #[test]
    fn test_whitespace_only_optional_omitted() {
        let mut fa = fa_back();
        fa.bezel = "  ".to_string();
        let url = build_url(EP, &ProductConfig::Fa(fa)).unwrap();
        assert!(!url.contains("bezel"));
    }

    #[test]
    fn test_json_url_strips_individual() {
        let url = format!("{}&model=fa-x20r4&individual", EP);
        assert_eq!(json_url(&url), format!("{}&model=fa-x20r4&json=True", EP));

        let url = format!("{}&individual&model=fa-x20r4", EP);
        assert_eq!(json_url(&url), format!("{}&model=fa-x20r4&json=True", EP));
    }

    #[test]
    fn test_vssx_url() {
        let urls = diagram_urls(EP, &ProductConfig::Fa(fa_back())).unwrap();
        assert_eq!(urls.vssx_url, format!("{}&vssx=True", urls.url));
        assert_eq!(urls.json_url, format!("{}&json=True", urls.url));
    }
}
