//! Utilities.
use anyhow::{anyhow, Context, Result};
use candle_nn::VarMap;
use log::trace;

/// Apply soft update on variables.
///
/// Variables are identified by their names.
///
/// dest = tau * src + (1.0 - tau) * dest
pub fn track(dest: &VarMap, src: &VarMap, tau: f64) -> Result<()> {
    trace!("dest");
    let dest = dest
        .data()
        .lock()
        .map_err(|_| anyhow!("Lock of the destination variables is poisoned"))?;
    trace!("src");
    let src = src
        .data()
        .lock()
        .map_err(|_| anyhow!("Lock of the source variables is poisoned"))?;

    for (name, v_dest) in dest.iter() {
        let v_src = src
            .get(name)
            .with_context(|| format!("Variable {} is missing in the source", name))?;
        let t_src = v_src.as_tensor().affine(tau, 0.0)?;
        let t_dest = v_dest.as_tensor().affine(1.0 - tau, 0.0)?;
        v_dest.set(&(t_src + t_dest)?)?;
    }

    Ok(())
}

/// Copies the values of variables in `src` to `dest`.
pub fn copy(dest: &VarMap, src: &VarMap) -> Result<()> {
    track(dest, src, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device, Tensor};
    use candle_nn::Init;

    fn varmap(values: &[f32]) -> Result<VarMap> {
        let vm = VarMap::new();
        let init = Init::Randn {
            mean: 0.0,
            stdev: 1.0,
        };
        vm.get((values.len(),), "var1", init, DType::F32, &Device::Cpu)?;
        let t = Tensor::from_slice(values, (values.len(),), &Device::Cpu)?;
        vm.data().lock().unwrap().get("var1").unwrap().set(&t)?;
        Ok(vm)
    }

    fn values(vm: &VarMap) -> Result<Vec<f32>> {
        let data = vm.data().lock().unwrap();
        Ok(data.get("var1").unwrap().as_tensor().to_vec1::<f32>()?)
    }

    #[test]
    fn test_track() -> Result<()> {
        let vm_src = varmap(&[1.0, 2.0, 3.0])?;
        let vm_dest = varmap(&[4.0, 5.0, 6.0])?;
        track(&vm_dest, &vm_src, 0.7)?;

        let expected = [1.9f32, 2.9, 3.9];
        for (v, e) in values(&vm_dest)?.iter().zip(expected.iter()) {
            assert!((v - e).abs() < 1e-5);
        }
        // The source is left untouched
        assert_eq!(values(&vm_src)?, vec![1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_copy() -> Result<()> {
        let vm_src = varmap(&[1.0, 2.0, 3.0])?;
        let vm_dest = varmap(&[4.0, 5.0, 6.0])?;
        copy(&vm_dest, &vm_src)?;
        assert_eq!(values(&vm_dest)?, vec![1.0, 2.0, 3.0]);

        // Updating the copy does not alias the source
        track(&vm_dest, &varmap(&[0.0, 0.0, 0.0])?, 1.0)?;
        assert_eq!(values(&vm_src)?, vec![1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_missing_variable() -> Result<()> {
        let vm_src = VarMap::new();
        let vm_dest = varmap(&[4.0])?;
        assert!(track(&vm_dest, &vm_src, 0.5).is_err());
        Ok(())
    }
}
